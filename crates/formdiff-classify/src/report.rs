//! The classification report.
//!
//! Collections are created on first use; an absent collection serializes as
//! a missing key, never as an empty list. The exception is [`ChangedRule`],
//! whose three collections are always present.

use std::collections::BTreeMap;

use formdiff_types::{FieldIndex, RuleIndex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path_class::RawPath;

/// Identity of a field as found in one of the two documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub name: Option<String>,
    pub field_type: Option<String>,
    pub index: FieldIndex,
    pub field_id: Option<Value>,
}

impl FieldSummary {
    /// A summary for a position neither document has.
    pub fn unresolved(index: FieldIndex) -> Self {
        Self { name: None, field_type: None, index, field_id: None }
    }
}

/// Direction of an iterable element change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeAction {
    Added,
    Removed,
}

/// One property-level change.
///
/// `property_name` is the setting name when the path had a known shape, and
/// the raw path otherwise, in which case `path_array` carries its tokens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ChangeAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_array: Option<Vec<String>>,
}

impl PropertyEntry {
    /// A named setting that appeared or disappeared.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            property_name: name.into(),
            old_value: None,
            new_value: None,
            value: None,
            action: None,
            path_array: None,
        }
    }

    /// A path with no known shape that appeared or disappeared.
    pub fn unmatched(raw: RawPath) -> Self {
        Self {
            path_array: Some(raw.path_array),
            ..Self::named(raw.raw)
        }
    }

    /// A named setting whose value changed.
    pub fn changed(name: impl Into<String>, old: Value, new: Value) -> Self {
        Self {
            old_value: Some(old),
            new_value: Some(new),
            ..Self::named(name)
        }
    }

    /// A path with no known shape whose value changed.
    pub fn changed_unmatched(raw: RawPath, old: Value, new: Value) -> Self {
        Self {
            old_value: Some(old),
            new_value: Some(new),
            ..Self::unmatched(raw)
        }
    }

    /// A sequence element that was added or removed.
    pub fn iterable(raw: RawPath, value: Value, action: ChangeAction) -> Self {
        Self {
            value: Some(value),
            action: Some(action),
            ..Self::unmatched(raw)
        }
    }
}

/// A rule added to or removed from a field, with its whole value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntry {
    pub rule_index: RuleIndex,
    pub rule: Value,
}

/// Setting-level changes inside one surviving rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedRule {
    pub rule_index: RuleIndex,
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
    pub changed_properties: Vec<PropertyEntry>,
    pub added_properties: Vec<PropertyEntry>,
    pub removed_properties: Vec<PropertyEntry>,
}

impl ChangedRule {
    pub fn new(rule_index: RuleIndex, rule_type: Option<String>) -> Self {
        Self {
            rule_index,
            rule_type,
            changed_properties: Vec::new(),
            added_properties: Vec::new(),
            removed_properties: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.changed_properties.len() + self.added_properties.len() + self.removed_properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Names of the lazily created property collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyBucket {
    Added,
    Removed,
    Changed,
    IterableAdded,
    IterableRemoved,
}

/// Property-level collections shared by field and form entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_properties: Option<Vec<PropertyEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_properties: Option<Vec<PropertyEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_properties: Option<Vec<PropertyEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterable_added: Option<Vec<PropertyEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterable_removed: Option<Vec<PropertyEntry>>,
}

impl PropertyChanges {
    /// The named collection, created empty on first use.
    pub fn bucket_mut(&mut self, bucket: PropertyBucket) -> &mut Vec<PropertyEntry> {
        let slot = match bucket {
            PropertyBucket::Added => &mut self.added_properties,
            PropertyBucket::Removed => &mut self.removed_properties,
            PropertyBucket::Changed => &mut self.changed_properties,
            PropertyBucket::IterableAdded => &mut self.iterable_added,
            PropertyBucket::IterableRemoved => &mut self.iterable_removed,
        };
        slot.get_or_insert_with(Vec::new)
    }

    /// The named collection, if it was ever created.
    pub fn bucket(&self, bucket: PropertyBucket) -> Option<&[PropertyEntry]> {
        let slot = match bucket {
            PropertyBucket::Added => &self.added_properties,
            PropertyBucket::Removed => &self.removed_properties,
            PropertyBucket::Changed => &self.changed_properties,
            PropertyBucket::IterableAdded => &self.iterable_added,
            PropertyBucket::IterableRemoved => &self.iterable_removed,
        };
        slot.as_deref()
    }

    pub fn len(&self) -> usize {
        [
            &self.added_properties,
            &self.removed_properties,
            &self.changed_properties,
            &self.iterable_added,
            &self.iterable_removed,
        ]
        .into_iter()
        .map(|slot| slot.as_ref().map_or(0, Vec::len))
        .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Form-level changes: paths that do not resolve to a field.
pub type FormChangeEntry = PropertyChanges;

/// All changes routed to one field position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChangeEntry {
    #[serde(flatten)]
    pub summary: FieldSummary,
    #[serde(flatten)]
    pub properties: PropertyChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_rules: Option<Vec<RuleEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_rules: Option<Vec<RuleEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_rules: Option<BTreeMap<RuleIndex, ChangedRule>>,
}

impl FieldChangeEntry {
    pub fn new(summary: FieldSummary) -> Self {
        Self {
            summary,
            properties: PropertyChanges::default(),
            added_rules: None,
            removed_rules: None,
            changed_rules: None,
        }
    }

    /// Number of change entries recorded for this field.
    pub fn len(&self) -> usize {
        self.properties.len()
            + self.added_rules.as_ref().map_or(0, Vec::len)
            + self.removed_rules.as_ref().map_or(0, Vec::len)
            + self
                .changed_rules
                .as_ref()
                .map_or(0, |rules| rules.values().map(ChangedRule::len).sum::<usize>())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The result of one classification pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub field_changes: BTreeMap<FieldIndex, FieldChangeEntry>,
    pub form_changes: FormChangeEntry,
    pub added_fields: Vec<FieldSummary>,
    pub removed_fields: Vec<FieldSummary>,
    /// Distance between the documents, in `[0, 100]` with two decimals.
    pub change_distance: f64,
}

impl Report {
    /// Total number of entries across every bucket.
    pub fn entry_count(&self) -> usize {
        self.added_fields.len()
            + self.removed_fields.len()
            + self.form_changes.len()
            + self.field_changes.values().map(FieldChangeEntry::len).sum::<usize>()
    }

    /// Returns `true` if the documents are structurally identical.
    pub fn is_unchanged(&self) -> bool {
        self.entry_count() == 0
    }
}

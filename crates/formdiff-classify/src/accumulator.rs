//! Change buckets for one classification pass.
//!
//! Every operation is get-or-create-then-append. Field identity is resolved
//! once, when a field position is first touched; a rule's type is resolved
//! once, when its bucket is first touched. Appends always go to the end of
//! the target collection, so the report keeps the order records arrive in.

use std::collections::BTreeMap;

use formdiff_types::{FieldIndex, RuleIndex};

use crate::lookup::FieldLookup;
use crate::report::{
    ChangedRule, FieldChangeEntry, FieldSummary, FormChangeEntry, PropertyBucket, PropertyEntry,
    Report, RuleEntry,
};

pub struct ChangeAccumulator<'d> {
    lookup: FieldLookup<'d>,
    field_changes: BTreeMap<FieldIndex, FieldChangeEntry>,
    form_changes: FormChangeEntry,
    added_fields: Vec<FieldSummary>,
    removed_fields: Vec<FieldSummary>,
}

impl<'d> ChangeAccumulator<'d> {
    pub fn new(lookup: FieldLookup<'d>) -> Self {
        Self {
            lookup,
            field_changes: BTreeMap::new(),
            form_changes: FormChangeEntry::default(),
            added_fields: Vec::new(),
            removed_fields: Vec::new(),
        }
    }

    /// The change entry for `index`, created with the field's identity on
    /// first use.
    pub fn ensure_field(&mut self, index: &FieldIndex) -> &mut FieldChangeEntry {
        let lookup = &self.lookup;
        self.field_changes
            .entry(index.clone())
            .or_insert_with(|| FieldChangeEntry::new(lookup.summary(index)))
    }

    /// A property collection of field `index`.
    pub fn field_bucket(&mut self, index: &FieldIndex, bucket: PropertyBucket) -> &mut Vec<PropertyEntry> {
        self.ensure_field(index).properties.bucket_mut(bucket)
    }

    /// A property collection of the form-level entry.
    pub fn form_bucket(&mut self, bucket: PropertyBucket) -> &mut Vec<PropertyEntry> {
        self.form_changes.bucket_mut(bucket)
    }

    pub fn added_rules(&mut self, index: &FieldIndex) -> &mut Vec<RuleEntry> {
        self.ensure_field(index).added_rules.get_or_insert_with(Vec::new)
    }

    pub fn removed_rules(&mut self, index: &FieldIndex) -> &mut Vec<RuleEntry> {
        self.ensure_field(index).removed_rules.get_or_insert_with(Vec::new)
    }

    /// The per-rule bucket of rule `rule` in field `index`, created with the
    /// rule's type on first use.
    pub fn ensure_rule(&mut self, index: &FieldIndex, rule: &RuleIndex) -> &mut ChangedRule {
        let lookup = self.lookup;
        self.ensure_field(index)
            .changed_rules
            .get_or_insert_with(BTreeMap::new)
            .entry(rule.clone())
            .or_insert_with(|| ChangedRule::new(rule.clone(), lookup.rule_type(index, rule)))
    }

    /// Record a field that exists only in the modified document.
    pub fn push_added_field(&mut self, index: &FieldIndex) {
        let summary = self.lookup.summary(index);
        self.added_fields.push(summary);
    }

    /// Record a field that exists only in the original document.
    pub fn push_removed_field(&mut self, index: &FieldIndex) {
        let summary = self.lookup.summary(index);
        self.removed_fields.push(summary);
    }

    /// Close the pass and produce the report.
    pub fn finish(self, change_distance: f64) -> Report {
        Report {
            field_changes: self.field_changes,
            form_changes: self.form_changes,
            added_fields: self.added_fields,
            removed_fields: self.removed_fields,
            change_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdiff_types::Document;
    use serde_json::json;

    fn docs() -> (Document, Document) {
        let original = Document::from_value(json!({
            "fields": [{"fieldId": 11, "name": "Age", "fieldType": "number", "rules": [{"type": "min", "value": 1}]}]
        }))
        .unwrap();
        let modified = Document::from_value(json!({
            "fields": [{"fieldId": 11, "name": "Years", "fieldType": "number", "rules": [{"type": "min", "value": 2}]}]
        }))
        .unwrap();
        (original, modified)
    }

    #[test]
    fn field_identity_populated_once() {
        let (original, modified) = docs();
        let mut acc = ChangeAccumulator::new(FieldLookup::new(&original, &modified));
        let idx = FieldIndex::from(0);

        acc.field_bucket(&idx, PropertyBucket::Changed)
            .push(PropertyEntry::changed("name", json!("Age"), json!("Years")));
        acc.ensure_field(&idx).summary.name = Some("tampered".into());
        acc.field_bucket(&idx, PropertyBucket::Added).push(PropertyEntry::named("hint"));

        let report = acc.finish(0.0);
        let entry = &report.field_changes[&idx];
        assert_eq!(entry.summary.name.as_deref(), Some("tampered"));
        assert_eq!(entry.len(), 2);
        assert!(entry.properties.removed_properties.is_none());
    }

    #[test]
    fn rule_bucket_created_once() {
        let (original, modified) = docs();
        let mut acc = ChangeAccumulator::new(FieldLookup::new(&original, &modified));
        let idx = FieldIndex::from(0);
        let rule = RuleIndex::from(0);

        acc.ensure_rule(&idx, &rule)
            .changed_properties
            .push(PropertyEntry::changed("value", json!(1), json!(2)));
        acc.ensure_rule(&idx, &rule).added_properties.push(PropertyEntry::named("message"));

        let report = acc.finish(0.0);
        let rules = report.field_changes[&idx].changed_rules.as_ref().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[&rule].rule_type.as_deref(), Some("min"));
        assert_eq!(rules[&rule].len(), 2);
    }

    #[test]
    fn appends_preserve_order() {
        let (original, modified) = docs();
        let mut acc = ChangeAccumulator::new(FieldLookup::new(&original, &modified));
        for name in ["a", "b", "c"] {
            acc.form_bucket(PropertyBucket::Removed).push(PropertyEntry::named(name));
        }
        let report = acc.finish(0.0);
        let names: Vec<&str> = report
            .form_changes
            .removed_properties
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.property_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn whole_field_lists_do_not_create_buckets() {
        let (original, modified) = docs();
        let mut acc = ChangeAccumulator::new(FieldLookup::new(&original, &modified));
        acc.push_removed_field(&FieldIndex::from(0));
        acc.push_added_field(&FieldIndex::from(5));
        let report = acc.finish(12.5);
        assert!(report.field_changes.is_empty());
        assert_eq!(report.removed_fields[0].name.as_deref(), Some("Age"));
        assert_eq!(report.added_fields[0], FieldSummary::unresolved(FieldIndex::from(5)));
        assert_eq!(report.change_distance, 12.5);
    }
}

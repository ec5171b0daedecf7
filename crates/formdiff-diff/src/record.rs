//! Change records and change sets.

use formdiff_types::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The category a change record belongs to.
///
/// Dictionary-style and iterable-style additions/removals are kept apart
/// because consumers report them differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    DictionaryItemAdded,
    IterableItemAdded,
    DictionaryItemRemoved,
    IterableItemRemoved,
    ValuesChanged,
    TypeChanges,
}

impl ChangeKind {
    /// Every category, in the order consumers process them:
    /// additions, removals, value changes, type changes.
    pub const ALL: [ChangeKind; 6] = [
        Self::DictionaryItemAdded,
        Self::IterableItemAdded,
        Self::DictionaryItemRemoved,
        Self::IterableItemRemoved,
        Self::ValuesChanged,
        Self::TypeChanges,
    ];

    pub fn is_addition(self) -> bool {
        matches!(self, Self::DictionaryItemAdded | Self::IterableItemAdded)
    }

    pub fn is_removal(self) -> bool {
        matches!(self, Self::DictionaryItemRemoved | Self::IterableItemRemoved)
    }

    /// Additions or removals of sequence elements.
    pub fn is_iterable(self) -> bool {
        matches!(self, Self::IterableItemAdded | Self::IterableItemRemoved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DictionaryItemAdded => "dictionary_item_added",
            Self::IterableItemAdded => "iterable_item_added",
            Self::DictionaryItemRemoved => "dictionary_item_removed",
            Self::IterableItemRemoved => "iterable_item_removed",
            Self::ValuesChanged => "values_changed",
            Self::TypeChanges => "type_changes",
        }
    }
}

/// A single change between two documents.
///
/// `old` is absent for additions, `new` is absent for removals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

impl ChangeRecord {
    pub fn added(kind: ChangeKind, path: Path, new: Value) -> Self {
        Self { kind, path, old: None, new: Some(new) }
    }

    pub fn removed(kind: ChangeKind, path: Path, old: Value) -> Self {
        Self { kind, path, old: Some(old), new: None }
    }

    pub fn changed(kind: ChangeKind, path: Path, old: Value, new: Value) -> Self {
        Self { kind, path, old: Some(old), new: Some(new) }
    }
}

/// All change records of one comparison, grouped by category.
///
/// Within a category, records keep the order the engine produced them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub dictionary_item_added: Vec<ChangeRecord>,
    pub iterable_item_added: Vec<ChangeRecord>,
    pub dictionary_item_removed: Vec<ChangeRecord>,
    pub iterable_item_removed: Vec<ChangeRecord>,
    pub values_changed: Vec<ChangeRecord>,
    pub type_changes: Vec<ChangeRecord>,
    /// Raw distance in `[0, 1]`, present when requested.
    pub deep_distance: Option<f64>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the category named by its kind.
    pub fn push(&mut self, record: ChangeRecord) {
        self.bucket_mut(record.kind).push(record);
    }

    /// Records of one category.
    pub fn records(&self, kind: ChangeKind) -> &[ChangeRecord] {
        match kind {
            ChangeKind::DictionaryItemAdded => &self.dictionary_item_added,
            ChangeKind::IterableItemAdded => &self.iterable_item_added,
            ChangeKind::DictionaryItemRemoved => &self.dictionary_item_removed,
            ChangeKind::IterableItemRemoved => &self.iterable_item_removed,
            ChangeKind::ValuesChanged => &self.values_changed,
            ChangeKind::TypeChanges => &self.type_changes,
        }
    }

    fn bucket_mut(&mut self, kind: ChangeKind) -> &mut Vec<ChangeRecord> {
        match kind {
            ChangeKind::DictionaryItemAdded => &mut self.dictionary_item_added,
            ChangeKind::IterableItemAdded => &mut self.iterable_item_added,
            ChangeKind::DictionaryItemRemoved => &mut self.dictionary_item_removed,
            ChangeKind::IterableItemRemoved => &mut self.iterable_item_removed,
            ChangeKind::ValuesChanged => &mut self.values_changed,
            ChangeKind::TypeChanges => &mut self.type_changes,
        }
    }

    /// Every record, categories in [`ChangeKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> {
        ChangeKind::ALL
            .into_iter()
            .flat_map(move |kind| self.records(kind).iter())
    }

    pub fn len(&self) -> usize {
        ChangeKind::ALL.iter().map(|k| self.records(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_routes_by_kind() {
        let mut set = ChangeSet::new();
        set.push(ChangeRecord::added(
            ChangeKind::IterableItemAdded,
            Path::root().child("tags").child(0),
            json!("a"),
        ));
        set.push(ChangeRecord::changed(
            ChangeKind::ValuesChanged,
            Path::root().child("title"),
            json!("x"),
            json!("y"),
        ));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iterable_item_added.len(), 1);
        assert_eq!(set.values_changed.len(), 1);
        assert!(set.records(ChangeKind::TypeChanges).is_empty());
    }

    #[test]
    fn iter_follows_processing_order() {
        let mut set = ChangeSet::new();
        set.push(ChangeRecord::changed(ChangeKind::TypeChanges, Path::root().child("a"), json!(1), json!("1")));
        set.push(ChangeRecord::removed(ChangeKind::DictionaryItemRemoved, Path::root().child("b"), json!(2)));
        set.push(ChangeRecord::added(ChangeKind::DictionaryItemAdded, Path::root().child("c"), json!(3)));
        let kinds: Vec<ChangeKind> = set.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::DictionaryItemAdded,
                ChangeKind::DictionaryItemRemoved,
                ChangeKind::TypeChanges,
            ]
        );
    }

    #[test]
    fn kind_families() {
        assert!(ChangeKind::IterableItemAdded.is_addition());
        assert!(ChangeKind::IterableItemAdded.is_iterable());
        assert!(ChangeKind::DictionaryItemRemoved.is_removal());
        assert!(!ChangeKind::DictionaryItemRemoved.is_iterable());
        assert!(!ChangeKind::TypeChanges.is_addition() && !ChangeKind::TypeChanges.is_removal());
        assert_eq!(ChangeKind::ValuesChanged.as_str(), "values_changed");
    }
}

//! The diff engine seam and its default tree-walking implementation.

use formdiff_types::{kind_name, Path};
use serde_json::Value;

use crate::distance::{leaf_count, raw_distance};
use crate::record::{ChangeKind, ChangeRecord, ChangeSet};

/// Predicate deciding whether a path is left out of the comparison.
pub type ExcludeFn<'a> = dyn Fn(&Path) -> bool + 'a;

/// Per-comparison options.
#[derive(Clone, Copy, Default)]
pub struct DiffOptions<'a> {
    /// Paths for which this returns `true` produce no records and add no
    /// distance weight; their subtrees are not visited.
    pub exclude: Option<&'a ExcludeFn<'a>>,
    /// Populate [`ChangeSet::deep_distance`].
    pub compute_distance: bool,
}

impl<'a> DiffOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude(mut self, exclude: &'a ExcludeFn<'a>) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_distance(mut self) -> Self {
        self.compute_distance = true;
        self
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.is_some_and(|f| f(path))
    }
}

/// A structural comparison of two JSON trees.
pub trait DiffEngine {
    fn diff(&self, original: &Value, modified: &Value, options: &DiffOptions<'_>) -> ChangeSet;
}

/// Positional, depth-first tree diff.
///
/// Objects are compared key by key; arrays are compared position by
/// position, with trailing extra elements reported as iterable
/// additions/removals. Differing scalars of the same JSON kind are value
/// changes, anything with differing kinds is a type change.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeDiffEngine;

impl DiffEngine for TreeDiffEngine {
    fn diff(&self, original: &Value, modified: &Value, options: &DiffOptions<'_>) -> ChangeSet {
        let mut walker = Walker {
            options,
            changes: ChangeSet::new(),
            changed_weight: 0,
        };
        walker.walk(&Path::root(), original, modified);

        let mut changes = walker.changes;
        if options.compute_distance {
            let root = Path::root();
            let total = leaf_count(original, &root, options) + leaf_count(modified, &root, options);
            changes.deep_distance = Some(raw_distance(walker.changed_weight, total));
        }
        tracing::debug!(records = changes.len(), distance = ?changes.deep_distance, "tree diff complete");
        changes
    }
}

struct Walker<'o, 'a> {
    options: &'o DiffOptions<'a>,
    changes: ChangeSet,
    changed_weight: usize,
}

impl Walker<'_, '_> {
    fn walk(&mut self, path: &Path, old: &Value, new: &Value) {
        if self.options.is_excluded(path) {
            return;
        }
        match (old, new) {
            (Value::Object(before), Value::Object(after)) => {
                for (key, value) in before {
                    if !after.contains_key(key) {
                        self.removed(ChangeKind::DictionaryItemRemoved, path.child(key.as_str()), value);
                    }
                }
                for (key, value) in after {
                    if !before.contains_key(key) {
                        self.added(ChangeKind::DictionaryItemAdded, path.child(key.as_str()), value);
                    }
                }
                for (key, value) in before {
                    if let Some(other) = after.get(key) {
                        self.walk(&path.child(key.as_str()), value, other);
                    }
                }
            }
            (Value::Array(before), Value::Array(after)) => {
                let shared = before.len().min(after.len());
                for (i, value) in before.iter().enumerate().skip(shared) {
                    self.removed(ChangeKind::IterableItemRemoved, path.child(i), value);
                }
                for (i, value) in after.iter().enumerate().skip(shared) {
                    self.added(ChangeKind::IterableItemAdded, path.child(i), value);
                }
                for (i, (value, other)) in before.iter().zip(after.iter()).enumerate() {
                    self.walk(&path.child(i), value, other);
                }
            }
            _ if old == new => {}
            _ if kind_name(old) == kind_name(new) => {
                self.changed_weight += 2;
                self.changes.push(ChangeRecord::changed(
                    ChangeKind::ValuesChanged,
                    path.clone(),
                    old.clone(),
                    new.clone(),
                ));
            }
            _ => {
                self.changed_weight +=
                    leaf_count(old, path, self.options) + leaf_count(new, path, self.options);
                self.changes.push(ChangeRecord::changed(
                    ChangeKind::TypeChanges,
                    path.clone(),
                    old.clone(),
                    new.clone(),
                ));
            }
        }
    }

    fn added(&mut self, kind: ChangeKind, path: Path, value: &Value) {
        if self.options.is_excluded(&path) {
            return;
        }
        self.changed_weight += leaf_count(value, &path, self.options);
        self.changes.push(ChangeRecord::added(kind, path, value.clone()));
    }

    fn removed(&mut self, kind: ChangeKind, path: Path, value: &Value) {
        if self.options.is_excluded(&path) {
            return;
        }
        self.changed_weight += leaf_count(value, &path, self.options);
        self.changes.push(ChangeRecord::removed(kind, path, value.clone()));
    }
}

//! Raw structural distance.
//!
//! Distance is the share of leaves touched by the diff: every added or
//! removed subtree weighs its leaf count, a value change weighs two (one leaf
//! on each side), and a type change weighs the leaves on both sides. The
//! total is the leaf count of both documents, so the ratio stays in `[0, 1]`.

use formdiff_types::Path;
use serde_json::Value;

use crate::engine::DiffOptions;

/// Number of leaves under `value`, skipping excluded subtrees.
///
/// Scalars and empty containers count as one leaf.
pub fn leaf_count(value: &Value, path: &Path, options: &DiffOptions<'_>) -> usize {
    if options.is_excluded(path) {
        return 0;
    }
    match value {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(k, v)| leaf_count(v, &path.child(k.as_str()), options))
            .sum(),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(i, v)| leaf_count(v, &path.child(i), options))
            .sum(),
        _ => 1,
    }
}

/// `changed / total`, clamped to `[0, 1]`; zero when there is nothing to compare.
pub fn raw_distance(changed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (changed as f64 / total as f64).clamp(0.0, 1.0)
}

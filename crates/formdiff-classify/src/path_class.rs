//! Structural categories of change paths.
//!
//! Shapes are matched against the typed path segments, first match wins:
//!
//! 1. `fields[i][rules][r][setting]`  -> [`PathClass::RuleSetting`]
//! 2. `fields[i][rules][r]`           -> [`PathClass::WholeRule`]
//! 3. `fields[i][setting]`            -> [`PathClass::FieldSetting`]
//! 4. `fields[i][properties][name]`   -> [`PathClass::FieldProperty`]
//! 5. `fields[i]`                     -> [`PathClass::WholeField`]
//! 6. anything else under `fields[i]` -> [`PathClass::Unclassified`]
//! 7. anything not under `fields[i]`  -> [`PathClass::FormSetting`]
//!
//! Setting and property names must be runs of `[A-Za-z0-9_-]`; a name outside
//! that set drops the path through to the unclassified fallback.

use formdiff_types::{
    is_name_token, FieldIndex, Path, PathSegment, RuleIndex, FIELDS_KEY, PROPERTIES_KEY, RULES_KEY,
};
use serde::{Deserialize, Serialize};

/// A path kept verbatim for the client, plus its tokenized segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPath {
    pub raw: String,
    pub path_array: Vec<String>,
}

impl From<&Path> for RawPath {
    fn from(path: &Path) -> Self {
        let raw = path.to_string();
        let path_array = formdiff_types::tokenize_path(&raw);
        Self { raw, path_array }
    }
}

/// The outcome of classifying one change path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathClass {
    WholeField {
        field: FieldIndex,
    },
    FieldSetting {
        field: FieldIndex,
        name: String,
    },
    FieldProperty {
        field: FieldIndex,
        name: String,
    },
    WholeRule {
        field: FieldIndex,
        rule: RuleIndex,
    },
    RuleSetting {
        field: FieldIndex,
        rule: RuleIndex,
        setting: String,
    },
    FormSetting {
        raw: RawPath,
    },
    Unclassified {
        field: FieldIndex,
        raw: RawPath,
    },
}

fn setting_name(segment: &PathSegment) -> Option<String> {
    segment
        .as_key()
        .filter(|name| is_name_token(name))
        .map(str::to_string)
}

fn rule_position(rules: &PathSegment, rule: &PathSegment) -> Option<RuleIndex> {
    if rules.is_key(RULES_KEY) {
        RuleIndex::from_segment(rule)
    } else {
        None
    }
}

/// Classify a change path.
pub fn classify_path(path: &Path) -> PathClass {
    let field = match path.segments() {
        [head, index, ..] if head.is_key(FIELDS_KEY) => FieldIndex::from_segment(index),
        _ => None,
    };
    let Some(field) = field else {
        return PathClass::FormSetting { raw: RawPath::from(path) };
    };

    match &path.segments()[2..] {
        [rules, rule, setting] => {
            if let (Some(rule), Some(setting)) = (rule_position(rules, rule), setting_name(setting)) {
                return PathClass::RuleSetting { field, rule, setting };
            }
        }
        [rules, rule] => {
            if let Some(rule) = rule_position(rules, rule) {
                return PathClass::WholeRule { field, rule };
            }
            if rules.is_key(PROPERTIES_KEY) {
                if let Some(name) = setting_name(rule) {
                    return PathClass::FieldProperty { field, name };
                }
            }
        }
        [setting] => {
            if let Some(name) = setting_name(setting) {
                return PathClass::FieldSetting { field, name };
            }
        }
        [] => return PathClass::WholeField { field },
        _ => {}
    }

    PathClass::Unclassified { field, raw: RawPath::from(path) }
}

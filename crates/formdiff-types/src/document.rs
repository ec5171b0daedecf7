//! Form definition documents.
//!
//! A document is an arbitrary JSON object that must carry a `fields`
//! container. `fields` is normally an ordered list, but an object keyed by
//! string-encoded positions (`{"0": {...}, "1": {...}}`) is accepted too.

use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::index::{FieldIndex, RuleIndex};

pub const FIELDS_KEY: &str = "fields";
pub const RULES_KEY: &str = "rules";
pub const PROPERTIES_KEY: &str = "properties";
pub const UUID_KEY: &str = "uuid";

/// One version of a form definition. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Validate and wrap a parsed JSON value.
    pub fn from_value(root: Value) -> TypeResult<Self> {
        let object = root
            .as_object()
            .ok_or_else(|| TypeError::InvalidDocument("document must be a JSON object".into()))?;
        match object.get(FIELDS_KEY) {
            Some(Value::Array(_)) | Some(Value::Object(_)) => Ok(Self { root }),
            Some(other) => Err(TypeError::InvalidDocument(format!(
                "`{FIELDS_KEY}` must be a list, got {}",
                kind_name(other)
            ))),
            None => Err(TypeError::InvalidDocument(format!(
                "missing `{FIELDS_KEY}` list"
            ))),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Number of entries in the `fields` container.
    pub fn field_count(&self) -> usize {
        match self.root.get(FIELDS_KEY) {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(items)) => items.len(),
            _ => 0,
        }
    }

    /// The field at `index`, if this document has one there.
    pub fn field(&self, index: &FieldIndex) -> Option<FieldView<'_>> {
        let fields = self.root.get(FIELDS_KEY)?;
        position(fields, index.as_str()).map(FieldView)
    }
}

/// Read-only accessors over one field definition.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a>(&'a Value);

impl<'a> FieldView<'a> {
    pub fn value(&self) -> &'a Value {
        self.0
    }

    pub fn name(&self) -> Option<&'a str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn field_type(&self) -> Option<&'a str> {
        self.0.get("fieldType").and_then(Value::as_str)
    }

    /// The opaque `fieldId`, whatever JSON shape it has.
    pub fn field_id(&self) -> Option<&'a Value> {
        self.0.get("fieldId").filter(|v| !v.is_null())
    }

    /// The rule at `index` in this field's `rules` list.
    pub fn rule(&self, index: &RuleIndex) -> Option<&'a Value> {
        let rules = self.0.get(RULES_KEY)?;
        position(rules, index.as_str())
    }
}

/// Look up a string-encoded position in a list or in a position-keyed object.
fn position<'a>(container: &'a Value, pos: &str) -> Option<&'a Value> {
    match container {
        Value::Array(items) => pos.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(items) => items.get(pos),
        _ => None,
    }
}

/// Human-readable JSON kind, used in error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

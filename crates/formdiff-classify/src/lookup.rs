//! Two-document field resolution.
//!
//! A field position is looked up in the original document first and in the
//! modified document when the original has nothing there, so positions that
//! only exist after an edit (added fields) still resolve. Rules resolve the
//! other way round: the modified document first, so a rule reports the type
//! it has after the edit.

use formdiff_types::{Document, FieldIndex, FieldView, RuleIndex};
use serde_json::Value;

use crate::error::{ClassifyError, ClassifyResult};
use crate::report::FieldSummary;

#[derive(Clone, Copy, Debug)]
pub struct FieldLookup<'d> {
    original: &'d Document,
    modified: &'d Document,
}

impl<'d> FieldLookup<'d> {
    pub fn new(original: &'d Document, modified: &'d Document) -> Self {
        Self { original, modified }
    }

    /// The field at `index`, original document first.
    pub fn field(&self, index: &FieldIndex) -> ClassifyResult<FieldView<'d>> {
        self.original
            .field(index)
            .or_else(|| self.modified.field(index))
            .ok_or_else(|| ClassifyError::MissingField(index.clone()))
    }

    /// Identity summary of the field at `index`.
    pub fn resolve(&self, index: &FieldIndex) -> ClassifyResult<FieldSummary> {
        let field = self.field(index)?;
        Ok(FieldSummary {
            name: field.name().map(str::to_string),
            field_type: field.field_type().map(str::to_string),
            index: index.clone(),
            field_id: field.field_id().cloned(),
        })
    }

    /// Like [`Self::resolve`], degrading to an all-null summary when the
    /// position exists in neither document.
    pub fn summary(&self, index: &FieldIndex) -> FieldSummary {
        self.resolve(index).unwrap_or_else(|err| {
            tracing::warn!(field = %index, error = %err, "degrading to unresolved field summary");
            FieldSummary::unresolved(index.clone())
        })
    }

    /// The rule at `rule` of field `index`, modified document first.
    pub fn resolve_rule(&self, index: &FieldIndex, rule: &RuleIndex) -> ClassifyResult<&'d Value> {
        [self.modified, self.original]
            .into_iter()
            .find_map(|doc| doc.field(index).and_then(|field| field.rule(rule)))
            .ok_or_else(|| ClassifyError::MissingRule {
                field: index.clone(),
                rule: rule.clone(),
            })
    }

    /// The `type` of a rule, `None` when the rule cannot be found.
    pub fn rule_type(&self, index: &FieldIndex, rule: &RuleIndex) -> Option<String> {
        match self.resolve_rule(index, rule) {
            Ok(value) => value.get("type").and_then(Value::as_str).map(str::to_string),
            Err(err) => {
                tracing::warn!(field = %index, rule = %rule, error = %err, "rule type unavailable");
                None
            }
        }
    }
}

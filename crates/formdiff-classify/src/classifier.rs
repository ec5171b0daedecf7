//! The classification pass.
//!
//! Runs the diff engine with field `uuid` churn excluded, routes every change
//! record through [`classify_path`] into a fresh [`ChangeAccumulator`], and
//! assembles the [`Report`]. Each record produces exactly one report entry.

use formdiff_diff::{ChangeKind, ChangeRecord, DiffEngine, DiffOptions, TreeDiffEngine};
use formdiff_types::{Document, Path, FIELDS_KEY, UUID_KEY};
use serde_json::Value;

use crate::accumulator::ChangeAccumulator;
use crate::distance::normalize_distance;
use crate::error::ClassifyResult;
use crate::lookup::FieldLookup;
use crate::path_class::{classify_path, PathClass, RawPath};
use crate::report::{ChangeAction, PropertyBucket, PropertyEntry, Report, RuleEntry};

/// Returns `true` for `fields[<i>][uuid]`: field identity churn is never a
/// structural change.
pub fn is_field_uuid(path: &Path) -> bool {
    matches!(
        path.segments(),
        [fields, index, uuid]
            if fields.is_key(FIELDS_KEY) && index.as_position().is_some() && uuid.is_key(UUID_KEY)
    )
}

/// Classifies the differences between two form definitions.
#[derive(Clone, Debug, Default)]
pub struct Classifier<E = TreeDiffEngine> {
    engine: E,
}

impl Classifier<TreeDiffEngine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: DiffEngine> Classifier<E> {
    /// Use a different diff engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Validate two raw JSON documents and classify them.
    pub fn classify_values(&self, original: Value, modified: Value) -> ClassifyResult<Report> {
        let original = Document::from_value(original)?;
        let modified = Document::from_value(modified)?;
        Ok(self.classify(&original, &modified))
    }

    /// Run one classification pass. Neither document is modified.
    pub fn classify(&self, original: &Document, modified: &Document) -> Report {
        let options = DiffOptions::new().with_exclude(&is_field_uuid).with_distance();
        let changes = self.engine.diff(original.as_value(), modified.as_value(), &options);

        let mut acc = ChangeAccumulator::new(FieldLookup::new(original, modified));
        for record in changes.iter() {
            route(&mut acc, record);
        }

        let report = acc.finish(normalize_distance(changes.deep_distance));
        tracing::info!(
            records = changes.len(),
            original_fields = original.field_count(),
            modified_fields = modified.field_count(),
            fields_changed = report.field_changes.len(),
            fields_added = report.added_fields.len(),
            fields_removed = report.removed_fields.len(),
            distance = report.change_distance,
            "classification complete"
        );
        report
    }
}

/// Validate and classify two raw documents with the default engine.
pub fn classify(original: Value, modified: Value) -> ClassifyResult<Report> {
    Classifier::new().classify_values(original, modified)
}

fn route(acc: &mut ChangeAccumulator<'_>, record: &ChangeRecord) {
    let class = classify_path(&record.path);
    tracing::debug!(kind = record.kind.as_str(), path = %record.path, class = ?class, "routing change");

    match Membership::of(record.kind) {
        Some(membership) => route_membership(acc, record, class, membership),
        None => route_change(acc, record, class),
    }
}

#[derive(Clone, Copy)]
enum Membership {
    Added,
    Removed,
}

impl Membership {
    fn of(kind: ChangeKind) -> Option<Self> {
        if kind.is_addition() {
            Some(Self::Added)
        } else if kind.is_removal() {
            Some(Self::Removed)
        } else {
            None
        }
    }

    fn property_bucket(self, iterable: bool) -> PropertyBucket {
        match (self, iterable) {
            (Self::Added, false) => PropertyBucket::Added,
            (Self::Removed, false) => PropertyBucket::Removed,
            (Self::Added, true) => PropertyBucket::IterableAdded,
            (Self::Removed, true) => PropertyBucket::IterableRemoved,
        }
    }

    fn action(self) -> ChangeAction {
        match self {
            Self::Added => ChangeAction::Added,
            Self::Removed => ChangeAction::Removed,
        }
    }
}

/// Additions and removals.
fn route_membership(
    acc: &mut ChangeAccumulator<'_>,
    record: &ChangeRecord,
    class: PathClass,
    membership: Membership,
) {
    let value = match membership {
        Membership::Added => record.new.clone(),
        Membership::Removed => record.old.clone(),
    }
    .unwrap_or(Value::Null);
    let iterable = record.kind.is_iterable();

    match class {
        PathClass::WholeField { field } => match membership {
            Membership::Added => acc.push_added_field(&field),
            Membership::Removed => acc.push_removed_field(&field),
        },
        PathClass::WholeRule { field, rule } => {
            let entry = RuleEntry { rule_index: rule, rule: value };
            match membership {
                Membership::Added => acc.added_rules(&field).push(entry),
                Membership::Removed => acc.removed_rules(&field).push(entry),
            }
        }
        PathClass::RuleSetting { field, rule, setting } if !iterable => {
            let bucket = acc.ensure_rule(&field, &rule);
            let entries = match membership {
                Membership::Added => &mut bucket.added_properties,
                Membership::Removed => &mut bucket.removed_properties,
            };
            entries.push(PropertyEntry::named(setting));
        }
        PathClass::FieldSetting { field, name } | PathClass::FieldProperty { field, name }
            if !iterable =>
        {
            acc.field_bucket(&field, membership.property_bucket(false))
                .push(PropertyEntry::named(name));
        }
        PathClass::FormSetting { raw } => {
            let entry = membership_fallback(raw, value, membership, iterable);
            acc.form_bucket(membership.property_bucket(iterable)).push(entry);
        }
        PathClass::RuleSetting { field, .. }
        | PathClass::FieldSetting { field, .. }
        | PathClass::FieldProperty { field, .. }
        | PathClass::Unclassified { field, .. } => {
            let entry = membership_fallback(RawPath::from(&record.path), value, membership, iterable);
            acc.field_bucket(&field, membership.property_bucket(iterable)).push(entry);
        }
    }
}

fn membership_fallback(raw: RawPath, value: Value, membership: Membership, iterable: bool) -> PropertyEntry {
    if iterable {
        PropertyEntry::iterable(raw, value, membership.action())
    } else {
        PropertyEntry::unmatched(raw)
    }
}

/// Value and type changes, handled alike.
fn route_change(acc: &mut ChangeAccumulator<'_>, record: &ChangeRecord, class: PathClass) {
    let old = record.old.clone().unwrap_or(Value::Null);
    let new = record.new.clone().unwrap_or(Value::Null);

    match class {
        PathClass::RuleSetting { field, rule, setting } => {
            acc.ensure_rule(&field, &rule)
                .changed_properties
                .push(PropertyEntry::changed(setting, old, new));
        }
        PathClass::FieldSetting { field, name } | PathClass::FieldProperty { field, name } => {
            acc.field_bucket(&field, PropertyBucket::Changed)
                .push(PropertyEntry::changed(name, old, new));
        }
        PathClass::FormSetting { raw } => {
            acc.form_bucket(PropertyBucket::Changed)
                .push(PropertyEntry::changed_unmatched(raw, old, new));
        }
        PathClass::WholeField { field }
        | PathClass::WholeRule { field, .. }
        | PathClass::Unclassified { field, .. } => {
            let raw = RawPath::from(&record.path);
            acc.field_bucket(&field, PropertyBucket::Changed)
                .push(PropertyEntry::changed_unmatched(raw, old, new));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdiff_types::{FieldIndex, RuleIndex};
    use serde_json::json;

    fn run(original: Value, modified: Value) -> Report {
        classify(original, modified).unwrap()
    }

    fn email_form(rule_type: &str) -> Value {
        json!({
            "title": "Signup",
            "fields": [
                {"uuid": "u-1", "fieldId": "f-1", "name": "Email", "fieldType": "text",
                 "properties": {"label": "Email"}, "rules": [{"type": rule_type}]}
            ]
        })
    }

    #[test]
    fn rule_type_change_scenario() {
        let report = run(email_form("required"), email_form("email_format"));
        let entry = &report.field_changes[&FieldIndex::from(0)];
        let rule = &entry.changed_rules.as_ref().unwrap()[&RuleIndex::from(0)];
        assert_eq!(
            serde_json::to_value(rule).unwrap(),
            json!({
                "ruleIndex": "0",
                "type": "email_format",
                "changedProperties": [
                    {"propertyName": "type", "oldValue": "required", "newValue": "email_format"}
                ],
                "addedProperties": [],
                "removedProperties": [],
            })
        );
        assert_eq!(entry.summary.name.as_deref(), Some("Email"));
        assert!(entry.properties.changed_properties.is_none());
    }

    #[test]
    fn identical_documents_except_uuid() {
        let mut modified = email_form("required");
        modified["fields"][0]["uuid"] = json!("u-2");
        let report = run(email_form("required"), modified);
        assert!(report.is_unchanged());
        assert!(report.field_changes.is_empty());
        assert!(report.added_fields.is_empty());
        assert!(report.removed_fields.is_empty());
        assert_eq!(report.change_distance, 0.0);
    }

    #[test]
    fn uuid_exclusion_is_exact() {
        assert!(is_field_uuid(&Path::root().child("fields").child("3").child("uuid")));
        assert!(is_field_uuid(&Path::root().child("fields").child(3).child("uuid")));
        assert!(!is_field_uuid(&Path::root().child("fields").child(3).child("properties").child("uuid")));
        assert!(!is_field_uuid(&Path::root().child("uuid")));
    }

    #[test]
    fn whole_field_removal_vs_setting_removal() {
        let original = json!({"fields": {
            "0": {"name": "A", "fieldType": "text"},
            "3": {"name": "D", "fieldType": "text", "fieldId": "d", "label": "Dee"}
        }});
        let modified = json!({"fields": {
            "0": {"name": "A", "fieldType": "text"}
        }});
        let report = run(original.clone(), modified);
        assert_eq!(report.removed_fields.len(), 1);
        assert_eq!(report.removed_fields[0].index, FieldIndex::from(3));
        assert_eq!(report.removed_fields[0].name.as_deref(), Some("D"));
        assert!(report.field_changes.is_empty());

        let mut modified = original.clone();
        modified["fields"]["3"].as_object_mut().unwrap().remove("label");
        let report = run(original, modified);
        let removed = report.field_changes[&FieldIndex::from(3)]
            .properties
            .removed_properties
            .as_ref()
            .unwrap();
        assert_eq!(removed, &vec![PropertyEntry::named("label")]);
    }

    #[test]
    fn appended_field_in_list_is_added_field() {
        let original = json!({"fields": [{"name": "A"}]});
        let modified = json!({"fields": [{"name": "A"}, {"name": "B", "fieldType": "date", "fieldId": 2}]});
        let report = run(original, modified);
        assert_eq!(report.added_fields.len(), 1);
        assert_eq!(report.added_fields[0].name.as_deref(), Some("B"));
        assert_eq!(report.added_fields[0].field_id, Some(json!(2)));
        assert!(report.field_changes.is_empty());
    }

    #[test]
    fn rules_added_and_removed() {
        let original = json!({"fields": [{"name": "A", "rules": [{"type": "required"}, {"type": "min", "value": 3}]}]});
        let modified = json!({"fields": [{"name": "A", "rules": [{"type": "required"}]}]});
        let report = run(original.clone(), modified.clone());
        let entry = &report.field_changes[&FieldIndex::from(0)];
        let removed = entry.removed_rules.as_ref().unwrap();
        assert_eq!(removed[0].rule_index, RuleIndex::from(1));
        assert_eq!(removed[0].rule, json!({"type": "min", "value": 3}));

        let report = run(modified, original);
        let added = report.field_changes[&FieldIndex::from(0)].added_rules.as_ref().unwrap();
        assert_eq!(added[0].rule["type"], "min");
    }

    #[test]
    fn rule_setting_added_lands_in_rule_bucket() {
        let original = json!({"fields": [{"rules": [{"type": "max"}]}]});
        let modified = json!({"fields": [{"rules": [{"type": "max", "value": 10}]}]});
        let report = run(original, modified);
        let rule = &report.field_changes[&FieldIndex::from(0)].changed_rules.as_ref().unwrap()[&RuleIndex::from(0)];
        assert_eq!(rule.added_properties, vec![PropertyEntry::named("value")]);
        assert!(rule.changed_properties.is_empty());
    }

    #[test]
    fn rule_setting_removed_lands_in_rule_bucket() {
        let original = json!({"fields": [{"rules": [{"type": "max", "value": 10}]}]});
        let modified = json!({"fields": [{"rules": [{"type": "max"}]}]});
        let report = run(original, modified);
        let entry = &report.field_changes[&FieldIndex::from(0)];
        let rule = &entry.changed_rules.as_ref().unwrap()[&RuleIndex::from(0)];
        assert_eq!(rule.rule_type.as_deref(), Some("max"));
        assert_eq!(rule.removed_properties, vec![PropertyEntry::named("value")]);
        assert!(rule.added_properties.is_empty());
        assert!(entry.properties.removed_properties.is_none());
        assert!(entry.removed_rules.is_none());
    }

    #[test]
    fn shrinking_field_list_lands_in_iterable_removed() {
        let original = json!({"fields": [{"properties": {"options": ["a", "b", "c"]}}]});
        let modified = json!({"fields": [{"properties": {"options": ["a", "b"]}}]});
        let report = run(original, modified);
        let entry = &report.field_changes[&FieldIndex::from(0)];

        let removed = entry.properties.iterable_removed.as_ref().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].property_name, "root['fields'][0]['properties']['options'][2]");
        assert_eq!(removed[0].value, Some(json!("c")));
        assert_eq!(removed[0].action, Some(ChangeAction::Removed));
        assert_eq!(
            removed[0].path_array.as_deref().unwrap(),
            ["fields", "0", "properties", "options", "2"]
        );
        assert!(entry.properties.iterable_added.is_none());
        assert!(entry.properties.removed_properties.is_none());
    }

    #[test]
    fn trailing_field_removed_from_list() {
        let original = json!({"fields": [
            {"name": "A"},
            {"name": "B", "fieldType": "checkbox", "fieldId": "b-1", "uuid": "x"}
        ]});
        let modified = json!({"fields": [{"name": "A"}]});
        let report = run(original, modified);
        assert!(report.field_changes.is_empty());
        assert!(report.added_fields.is_empty());
        assert_eq!(
            serde_json::to_value(&report.removed_fields).unwrap(),
            json!([{"name": "B", "fieldType": "checkbox", "index": "1", "fieldId": "b-1"}])
        );
    }

    #[test]
    fn form_level_list_shrink_lands_in_iterable_removed() {
        let original = json!({"tags": ["x", "y"], "fields": []});
        let modified = json!({"tags": ["x"], "fields": []});
        let report = run(original, modified);
        let removed = report.form_changes.iterable_removed.as_ref().unwrap();
        assert_eq!(
            serde_json::to_value(removed).unwrap(),
            json!([{
                "propertyName": "root['tags'][1]",
                "value": "y",
                "action": "REMOVED",
                "pathArray": ["tags", "1"],
            }])
        );
    }

    #[test]
    fn nested_property_change() {
        let original = json!({"fields": [{"properties": {"placeholder": "a"}}]});
        let modified = json!({"fields": [{"properties": {"placeholder": "b"}}]});
        let report = run(original, modified);
        let changed = report.field_changes[&FieldIndex::from(0)]
            .properties
            .changed_properties
            .as_ref()
            .unwrap();
        assert_eq!(changed, &vec![PropertyEntry::changed("placeholder", json!("a"), json!("b"))]);
    }

    #[test]
    fn type_change_treated_as_value_change() {
        let original = json!({"fields": [{"required": true}]});
        let modified = json!({"fields": [{"required": "yes"}]});
        let report = run(original, modified);
        let changed = report.field_changes[&FieldIndex::from(0)]
            .properties
            .changed_properties
            .as_ref()
            .unwrap();
        assert_eq!(changed[0].property_name, "required");
        assert_eq!(changed[0].old_value, Some(json!(true)));
        assert_eq!(changed[0].new_value, Some(json!("yes")));
    }

    #[test]
    fn deep_field_paths_use_fallback() {
        let original = json!({"fields": [{"properties": {"options": ["a", "b"]}}]});
        let modified = json!({"fields": [{"properties": {"options": ["a", "c", "d"]}}]});
        let report = run(original, modified);
        let entry = &report.field_changes[&FieldIndex::from(0)];

        let added = entry.properties.iterable_added.as_ref().unwrap();
        assert_eq!(added[0].property_name, "root['fields'][0]['properties']['options'][2]");
        assert_eq!(added[0].value, Some(json!("d")));
        assert_eq!(added[0].action, Some(ChangeAction::Added));
        assert_eq!(
            added[0].path_array.as_deref().unwrap(),
            ["fields", "0", "properties", "options", "2"]
        );

        let changed = entry.properties.changed_properties.as_ref().unwrap();
        assert_eq!(changed[0].property_name, "root['fields'][0]['properties']['options'][1]");
        assert!(changed[0].path_array.is_some());
    }

    #[test]
    fn form_level_changes() {
        let original = json!({"title": "A", "theme": {"dark": false}, "tags": ["x"], "fields": []});
        let modified = json!({"title": "B", "submit": "Go", "tags": ["x", "y"], "fields": []});
        let report = run(original, modified);
        assert!(report.field_changes.is_empty());

        let form = &report.form_changes;
        let changed = form.changed_properties.as_ref().unwrap();
        assert_eq!(changed[0].property_name, "root['title']");
        assert_eq!(changed[0].path_array.as_deref().unwrap(), ["title"]);
        assert_eq!(form.added_properties.as_ref().unwrap()[0].property_name, "root['submit']");
        assert_eq!(form.removed_properties.as_ref().unwrap()[0].property_name, "root['theme']");
        assert_eq!(form.iterable_added.as_ref().unwrap()[0].value, Some(json!("y")));
    }

    #[test]
    fn missing_fields_is_rejected() {
        let err = classify(json!({"title": "x"}), json!({"fields": []})).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn report_serializes_sibling_sections() {
        let report = run(email_form("required"), email_form("email_format"));
        let value = serde_json::to_value(&report).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["fieldChanges", "formChanges", "addedFields", "removedFields", "changeDistance"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(value["fieldChanges"]["0"]["changedRules"]["0"].is_object());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn rule() -> impl Strategy<Value = Value> {
            (prop::sample::select(vec!["required", "min", "max"]), prop::option::of(0u8..4)).prop_map(
                |(kind, value)| match value {
                    Some(v) => json!({"type": kind, "value": v}),
                    None => json!({"type": kind}),
                },
            )
        }

        fn field() -> impl Strategy<Value = Value> {
            (
                "[a-z]{1,3}",
                prop::sample::select(vec!["text", "number"]),
                0u8..3,
                prop::option::of("[a-c]{1,2}"),
                prop::collection::vec(rule(), 0..3),
                prop::collection::vec(0u8..3, 0..3),
            )
                .prop_map(|(name, field_type, uuid, label, rules, options)| {
                    let mut props = serde_json::Map::new();
                    if let Some(label) = label {
                        props.insert("label".into(), json!(label));
                    }
                    props.insert("options".into(), json!(options));
                    json!({
                        "uuid": uuid,
                        "name": name,
                        "fieldType": field_type,
                        "properties": props,
                        "rules": rules,
                    })
                })
        }

        fn form() -> impl Strategy<Value = Value> {
            (prop::option::of("[A-C]{1,2}"), prop::collection::vec(field(), 0..4)).prop_map(
                |(title, fields)| match title {
                    Some(title) => json!({"title": title, "fields": fields}),
                    None => json!({"fields": fields}),
                },
            )
        }

        proptest! {
            #[test]
            fn every_record_yields_one_entry(a in form(), b in form()) {
                let options = DiffOptions::new().with_exclude(&is_field_uuid);
                let records = TreeDiffEngine.diff(&a, &b, &options).len();
                let report = classify(a, b).unwrap();
                prop_assert_eq!(report.entry_count(), records);
            }

            #[test]
            fn classification_is_deterministic(a in form(), b in form()) {
                let first = serde_json::to_string(&classify(a.clone(), b.clone()).unwrap()).unwrap();
                let second = serde_json::to_string(&classify(a, b).unwrap()).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn distance_in_display_range(a in form(), b in form()) {
                let report = classify(a, b).unwrap();
                prop_assert!((0.0..=100.0).contains(&report.change_distance));
            }

            #[test]
            fn uuid_never_reported(a in form(), b in form()) {
                let value = serde_json::to_value(classify(a, b).unwrap()).unwrap();
                prop_assert!(!value.to_string().contains("['uuid']"));
            }
        }
    }
}

//! Checks the embedded catalog and file loading.

use std::io::Write;

use metatest_catalog::{Catalog, CatalogError, SelectMode, ValueInputType};
use metatest_core::{PropertyPredicate, TestAction};

fn builtin() -> Catalog {
    Catalog::builtin().unwrap_or_else(|e| panic!("builtin catalog failed to load: {}", e))
}

#[test]
fn test_builtin_catalog_loads() {
    let catalog = builtin();
    let types: Vec<&str> = catalog.entity_types().collect();
    assert_eq!(types, vec!["dataset", "dashboard", "chart", "container"]);
    assert!(catalog.is_unary_operator("exists"));
    assert!(catalog.operator("greater_than").is_some());
}

#[test]
fn test_single_type_returns_declared_properties() {
    let catalog = builtin();
    let dataset = catalog.properties_for_type("dataset");
    assert_eq!(catalog.properties_for_types(&["dataset"]), dataset);
    assert!(catalog.properties_for_type("mlModel").is_empty());
}

#[test]
fn test_intersection_is_smaller_than_each_type() {
    let catalog = builtin();
    let types = ["dataset", "chart", "dashboard"];
    let shared = catalog.properties_for_types(&types);
    assert!(!shared.is_empty());
    for t in types {
        assert!(
            shared.len() < catalog.properties_for_type(t).len(),
            "intersection should be smaller than the '{}' property set",
            t
        );
    }
    let ids: Vec<&str> = shared.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.contains(&"__firstSynchronized"));
    assert!(!ids.contains(&"datasetProfile.rowCount"));
}

#[test]
fn test_empty_types_have_no_properties() {
    assert!(builtin().properties_for_types::<&str>(&[]).is_empty());
}

#[test]
fn test_timestamp_property_uses_time_select() {
    let catalog = builtin();
    let props = catalog.properties_for_type("dataset");
    let predicate = PropertyPredicate::new("__firstSynchronized")
        .with_operator("greater_than")
        .with_values(["1"]);
    let input = catalog.value_options(&predicate, &props).unwrap();
    assert_eq!(input.input_type, ValueInputType::TimeSelect);
    assert!(input.options.is_none());
}

#[test]
fn test_value_input_kinds() {
    let catalog = builtin();
    let props = catalog.properties_for_type("dataset");
    let input_for = |property: &str, operator: &str| {
        let predicate = PropertyPredicate::new(property).with_operator(operator);
        catalog.value_options(&predicate, &props).map(|i| i.input_type)
    };

    assert_eq!(
        input_for("globalTags.tags.tag", "contains_any"),
        Some(ValueInputType::EntitySearch)
    );
    assert_eq!(
        input_for("subTypes.typeNames", "contains_any"),
        Some(ValueInputType::Select)
    );
    assert_eq!(
        input_for("ownership.owners.type", "equals"),
        Some(ValueInputType::Select)
    );
    assert_eq!(input_for("name", "regex_match"), Some(ValueInputType::Text));
    assert_eq!(input_for("name", "exists"), None);
}

#[test]
fn test_boolean_operators() {
    let catalog = builtin();
    let props = catalog.properties_for_type("dashboard");
    let predicate = PropertyPredicate::new("deprecation.deprecated");
    let ops = catalog.operator_options(&predicate, &props).unwrap();
    let ids: Vec<&str> = ops.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["is_true", "is_false"]);
    assert!(catalog.is_executable(&predicate.with_operator("is_true")));
}

#[test]
fn test_action_value_inputs() {
    let catalog = builtin();
    let action = |t: &str| TestAction {
        action_type: t.to_string(),
        values: vec![],
    };

    let add_tags = catalog.action_value_options(&action("add_tags")).unwrap();
    assert_eq!(add_tags.input_type, ValueInputType::EntitySearch);
    assert_eq!(add_tags.options.unwrap().mode, Some(SelectMode::Multiple));

    assert_eq!(
        catalog
            .action_value_options(&action("UNSET_DOMAIN"))
            .map(|i| i.input_type),
        Some(ValueInputType::None)
    );
    assert_eq!(
        catalog
            .action_value_options(&action("SET_DESCRIPTION"))
            .map(|i| i.input_type),
        Some(ValueInputType::Text)
    );
    assert!(catalog.action_value_options(&action("DELETE")).is_none());
}

#[test]
fn test_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "[[operators]]\nid = \"exists\"\ndisplay_name = \"Exists\"\nunary = true\n"
    )
    .unwrap();
    let catalog = Catalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.operators.len(), 1);
    assert!(catalog.entities.is_empty());
}

#[test]
fn test_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

//! The loaded catalog and the lookups the predicate builder runs against it.

use std::collections::HashSet;
use std::path::Path;

use metatest_core::{PropertyPredicate, TestAction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::model::*;

/// Value type ids with special handling.
pub mod value_types {
    pub const TIMESTAMP: &str = "TIMESTAMP";
    pub const URN: &str = "URN";
    pub const URN_LIST: &str = "URN_LIST";
    pub const NO_VALUE: &str = "NO_VALUE";
}

static BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

/// Operators, value types, entity property trees, and action types.
///
/// Immutable once loaded; share it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub value_types: Vec<ValueType>,
    #[serde(default)]
    pub entities: Vec<EntityProperties>,
    #[serde(default)]
    pub action_types: Vec<ActionType>,
}

impl Catalog {
    /// Parse and check a catalog from TOML text.
    pub fn from_toml_str(src: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = toml::from_str(src)?;
        catalog.check()?;
        debug!(
            operators = catalog.operators.len(),
            value_types = catalog.value_types.len(),
            entities = catalog.entities.len(),
            action_types = catalog.action_types.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Read a catalog from a TOML file.
    pub fn from_path(path: &Path) -> Result<Catalog, CatalogError> {
        let src = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Catalog::from_toml_str(&src)
    }

    /// The catalog compiled into this crate.
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Catalog::from_toml_str(BUILTIN_CATALOG)
    }

    /// Reject duplicate ids and dangling references.
    fn check(&self) -> Result<(), CatalogError> {
        unique("operator", self.operators.iter().map(|o| o.id.as_str()))?;
        unique("value type", self.value_types.iter().map(|v| v.id.as_str()))?;
        unique("entity type", self.entities.iter().map(|e| e.entity_type.as_str()))?;
        unique("action type", self.action_types.iter().map(|a| a.id.as_str()))?;

        for value_type in &self.value_types {
            for op in &value_type.operators {
                if self.operator(op).is_none() {
                    return Err(CatalogError::UnknownOperator {
                        value_type: value_type.id.clone(),
                        operator: op.clone(),
                    });
                }
            }
        }

        for entity in &self.entities {
            for property in &entity.properties {
                self.check_property(&entity.entity_type, property)?;
            }
        }

        for action in &self.action_types {
            if self.value_type(&action.value_type).is_none() {
                return Err(CatalogError::UnknownValueType {
                    owner: format!("action type '{}'", action.id),
                    value_type: action.value_type.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_property(&self, entity_type: &str, property: &Property) -> Result<(), CatalogError> {
        if self.value_type(&property.value_type).is_none() {
            return Err(CatalogError::UnknownValueType {
                owner: format!("property '{}' of '{}'", property.id, entity_type),
                value_type: property.value_type.clone(),
            });
        }
        for child in &property.children {
            self.check_property(entity_type, child)?;
        }
        Ok(())
    }

    // ── Operators ───────────────────────────────────────────────────

    pub fn operator(&self, id: &str) -> Option<&Operator> {
        self.operators.iter().find(|o| o.id == id)
    }

    /// True for operators that take no values. Unknown operators are not
    /// unary.
    pub fn is_unary_operator(&self, id: &str) -> bool {
        self.operator(id).is_some_and(|o| o.unary)
    }

    pub fn value_type(&self, id: &str) -> Option<&ValueType> {
        self.value_types.iter().find(|v| v.id == id)
    }

    // ── Properties ──────────────────────────────────────────────────

    /// Entity graph names with a declared property tree.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.entity_type.as_str())
    }

    /// Top-level properties of one entity type; empty if the type is unknown.
    pub fn properties_for_type(&self, entity_type: &str) -> Vec<&Property> {
        self.entities
            .iter()
            .find(|e| e.entity_type == entity_type)
            .map(|e| e.properties.iter().collect())
            .unwrap_or_default()
    }

    /// Properties supported by every given entity type, intersected by id.
    ///
    /// Order follows the last type's declaration. No types means no
    /// properties.
    pub fn properties_for_types<S: AsRef<str>>(&self, entity_types: &[S]) -> Vec<&Property> {
        let mut sets = entity_types
            .iter()
            .map(|t| self.properties_for_type(t.as_ref()));
        let Some(first) = sets.next() else {
            return Vec::new();
        };
        sets.fold(first, |acc, next| {
            let ids: HashSet<&str> = acc.iter().map(|p| p.id.as_str()).collect();
            next.into_iter()
                .filter(|p| ids.contains(p.id.as_str()))
                .collect()
        })
    }

    /// Operators offered for the predicate's property, from its value type.
    ///
    /// `None` when the predicate names no property or the property is not
    /// in `properties`.
    pub fn operator_options(
        &self,
        predicate: &PropertyPredicate,
        properties: &[&Property],
    ) -> Option<Vec<&Operator>> {
        if predicate.property.is_empty() {
            return None;
        }
        let Some(property) = find_property(&predicate.property, properties) else {
            warn!(
                property = %predicate.property,
                "unknown property, could not find operator options"
            );
            return None;
        };
        let operators = self
            .value_type(&property.value_type)
            .map(|v| v.operators.iter().filter_map(|op| self.operator(op)).collect())
            .unwrap_or_default();
        Some(operators)
    }

    /// The input used to collect values for a predicate.
    ///
    /// `None` when the predicate has no property or operator, the operator
    /// is unary, or the property is not in `properties`. Otherwise the
    /// first match of entity search, fixed select, time select, then text.
    pub fn value_options<'a>(
        &self,
        predicate: &PropertyPredicate,
        properties: &[&'a Property],
    ) -> Option<ValueInput<'a>> {
        let operator = predicate.operator.as_deref()?;
        if predicate.property.is_empty() || self.is_unary_operator(operator) {
            return None;
        }
        let Some(property) = find_property(&predicate.property, properties) else {
            warn!(
                property = %predicate.property,
                "unknown property, could not find value options"
            );
            return None;
        };

        let options = property.value_options.as_ref();
        let moded = options.filter(|o| o.mode.is_some());
        let input_type = if moded.is_some_and(|o| o.entity_types.is_some()) {
            ValueInputType::EntitySearch
        } else if moded.is_some_and(|o| o.options.is_some()) {
            ValueInputType::Select
        } else if property.value_type == value_types::TIMESTAMP {
            ValueInputType::TimeSelect
        } else {
            ValueInputType::Text
        };
        Some(ValueInput {
            input_type,
            options,
        })
    }

    /// A predicate can run once it has an operator, and values unless the
    /// operator is unary.
    pub fn is_executable(&self, predicate: &PropertyPredicate) -> bool {
        match predicate.operator.as_deref() {
            None => false,
            Some(op) => self.is_unary_operator(op) || predicate.values.is_some(),
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// The action type named by `action`, ignoring case. Ambiguous
    /// matches resolve to `None`.
    pub fn action_type(&self, action: &TestAction) -> Option<&ActionType> {
        let mut matches = self
            .action_types
            .iter()
            .filter(|t| t.id.eq_ignore_ascii_case(&action.action_type));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// The input used to collect values for `action`, if its type is known.
    pub fn action_value_options(&self, action: &TestAction) -> Option<ValueInput<'_>> {
        self.action_type(action).map(ActionType::value_input)
    }
}

impl ActionType {
    /// No input for value-less actions, entity search for URN values with
    /// entity types, text otherwise.
    pub fn value_input(&self) -> ValueInput<'_> {
        let options = self.value_options.as_ref();
        let is_urn = matches!(
            self.value_type.as_str(),
            value_types::URN | value_types::URN_LIST
        );
        let input_type = if self.value_type == value_types::NO_VALUE {
            ValueInputType::None
        } else if is_urn && options.is_some_and(|o| o.entity_types.is_some()) {
            ValueInputType::EntitySearch
        } else {
            ValueInputType::Text
        };
        ValueInput {
            input_type,
            options,
        }
    }
}

/// Depth-first search for a property id, checking each property before
/// its children.
pub fn find_property<'a>(id: &str, properties: &[&'a Property]) -> Option<&'a Property> {
    properties.iter().find_map(|p| find_in(id, p))
}

fn find_in<'a>(id: &str, property: &'a Property) -> Option<&'a Property> {
    if property.id == id {
        return Some(property);
    }
    property.children.iter().find_map(|c| find_in(id, c))
}

fn unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::Duplicate {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
[[operators]]
id = "exists"
display_name = "Exists"
unary = true

[[operators]]
id = "equals"
display_name = "Equals"

[[value_types]]
id = "STRING"
operators = ["exists", "equals"]

[[value_types]]
id = "TIMESTAMP"
operators = ["exists"]

[[value_types]]
id = "NO_VALUE"

[[entities]]
type = "a"

[[entities.properties]]
id = "x"
display_name = "X"
value_type = "STRING"

[[entities.properties.children]]
id = "x.y"
display_name = "X Y"
value_type = "TIMESTAMP"

[[entities.properties]]
id = "z"
display_name = "Z"
value_type = "STRING"

[[entities]]
type = "b"

[[entities.properties]]
id = "z"
display_name = "Z"
value_type = "STRING"

[[action_types]]
id = "CLEAR"
display_name = "Clear"
value_type = "NO_VALUE"
"#;

    fn small() -> Catalog {
        Catalog::from_toml_str(SMALL).unwrap()
    }

    fn pred(property: &str, operator: Option<&str>) -> PropertyPredicate {
        PropertyPredicate {
            property: property.to_string(),
            operator: operator.map(str::to_owned),
            values: None,
        }
    }

    #[test]
    fn test_operator_lookup() {
        let c = small();
        assert_eq!(c.operator("equals").unwrap().display_name, "Equals");
        assert!(c.is_unary_operator("exists"));
        assert!(!c.is_unary_operator("equals"));
        assert!(!c.is_unary_operator("nope"));
    }

    #[test]
    fn test_intersection() {
        let c = small();
        let ids = |props: Vec<&Property>| props.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(c.properties_for_types(&["a"])), vec!["x", "z"]);
        assert_eq!(ids(c.properties_for_types(&["a", "b"])), vec!["z"]);
        assert!(c.properties_for_types::<&str>(&[]).is_empty());
        assert!(c.properties_for_types(&["a", "unknown"]).is_empty());
    }

    #[test]
    fn test_find_property_descends_into_children() {
        let c = small();
        let props = c.properties_for_type("a");
        assert_eq!(find_property("x.y", &props).unwrap().display_name, "X Y");
        assert!(find_property("missing", &props).is_none());
    }

    #[test]
    fn test_operator_options() {
        let c = small();
        let props = c.properties_for_type("a");
        let ops = c.operator_options(&pred("x", None), &props).unwrap();
        let ids: Vec<_> = ops.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["exists", "equals"]);
        assert!(c.operator_options(&pred("", None), &props).is_none());
        assert!(c.operator_options(&pred("missing", None), &props).is_none());
    }

    #[test]
    fn test_value_options_gating() {
        let c = small();
        let props = c.properties_for_type("a");
        assert!(c.value_options(&pred("x", None), &props).is_none());
        assert!(c.value_options(&pred("x", Some("exists")), &props).is_none());
        assert!(c.value_options(&pred("missing", Some("equals")), &props).is_none());
        assert_eq!(
            c.value_options(&pred("x", Some("equals")), &props).unwrap().input_type,
            ValueInputType::Text
        );
        assert_eq!(
            c.value_options(&pred("x.y", Some("equals")), &props).unwrap().input_type,
            ValueInputType::TimeSelect
        );
    }

    #[test]
    fn test_is_executable() {
        let c = small();
        assert!(!c.is_executable(&pred("x", None)));
        assert!(c.is_executable(&pred("x", Some("exists"))));
        assert!(!c.is_executable(&pred("x", Some("equals"))));
        let with_values = PropertyPredicate::new("x")
            .with_operator("equals")
            .with_values(["1"]);
        assert!(c.is_executable(&with_values));
    }

    #[test]
    fn test_action_type_is_case_insensitive() {
        let c = small();
        let action = TestAction {
            action_type: "clear".to_string(),
            values: vec![],
        };
        assert_eq!(c.action_type(&action).unwrap().id, "CLEAR");
        assert_eq!(
            c.action_value_options(&action).unwrap().input_type,
            ValueInputType::None
        );
        let unknown = TestAction {
            action_type: "ADD".to_string(),
            values: vec![],
        };
        assert!(c.action_type(&unknown).is_none());
    }

    #[test]
    fn test_ambiguous_action_type_is_none() {
        let src = format!(
            "{}\n[[action_types]]\nid = \"clear\"\n\
             display_name = \"clear\"\nvalue_type = \"NO_VALUE\"\n",
            SMALL
        );
        let c = Catalog::from_toml_str(&src).unwrap();
        let action = TestAction {
            action_type: "Clear".to_string(),
            values: vec![],
        };
        assert!(c.action_type(&action).is_none());
    }

    #[test]
    fn test_rejects_dangling_references() {
        let err = Catalog::from_toml_str(
            "[[value_types]]\nid = \"STRING\"\noperators = [\"equals\"]\n",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownOperator { .. }), "{err}");

        let err = Catalog::from_toml_str(
            "[[entities]]\ntype = \"a\"\n[[entities.properties]]\n\
             id = \"x\"\ndisplay_name = \"X\"\nvalue_type = \"NOPE\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("NOPE"), "{err}");
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Catalog::from_toml_str(
            "[[operators]]\nid = \"a\"\ndisplay_name = \"A\"\n\
             [[operators]]\nid = \"a\"\ndisplay_name = \"A\"\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "duplicate operator id 'a'");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Catalog::from_toml_str("operators = 3"),
            Err(CatalogError::Parse(_))
        ));
    }
}

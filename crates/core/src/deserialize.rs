//! Deserialization from stored test definition JSON into typed structs.
//!
//! Stored definitions may predate the current field names. Everything is
//! funnelled through [`transform_predicate`], the single place where the
//! legacy leaf fields (`query`, `operation`, `params`) are reconciled with
//! `property`, `operator`, and `values`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::DefinitionError;
use crate::types::legacy::{MATCH, OPERATION, PARAMS, QUERY, VALUE};
use crate::types::*;

/// Convert a JSON-serialized test definition into a [`TestDefinition`].
///
/// Never fails: malformed JSON, or JSON missing the `on`/`rules` blocks,
/// yields [`TestDefinition::default`]. Use [`try_deserialize`] to find
/// out why a definition was rejected.
pub fn deserialize(json: &str) -> TestDefinition {
    match try_deserialize(json) {
        Ok(definition) => definition,
        Err(e) => {
            warn!(error = %e, "failed to transform test definition JSON, falling back to default");
            TestDefinition::default()
        }
    }
}

/// Like [`deserialize`], but reports the rejection instead of
/// substituting the default definition.
pub fn try_deserialize(json: &str) -> Result<TestDefinition, DefinitionError> {
    let raw: Value = serde_json::from_str(json)?;
    from_value(&raw)
}

/// Convert an already-parsed definition object.
pub fn from_value(raw: &Value) -> Result<TestDefinition, DefinitionError> {
    let obj = raw.as_object().ok_or(DefinitionError::NotAnObject {
        found: json_kind(raw),
    })?;

    let on = obj.get(ON).ok_or_else(|| DefinitionError::MissingField {
        field: ON.to_string(),
    })?;
    let on = transform_on(on)?;

    let rules = obj.get(RULES).ok_or_else(|| DefinitionError::MissingField {
        field: RULES.to_string(),
    })?;
    let rules = transform_predicate(rules);

    let actions = obj.get(ACTIONS).and_then(parse_actions);

    let extra: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), ON | RULES | ACTIONS))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(TestDefinition {
        on,
        rules,
        actions,
        extra,
    })
}

/// Recursively transform a raw predicate block into a [`TestPredicate`].
///
/// Falsy values (`null`, `false`, `0`, `""`) become the empty list, and are
/// dropped from arrays. Objects are checked for `and`, `or`, then `not`;
/// anything else is a leaf.
pub fn transform_predicate(raw: &Value) -> TestPredicate {
    match raw {
        Value::Array(items) => TestPredicate::List(
            items
                .iter()
                .filter(|v| is_truthy(v))
                .map(transform_predicate)
                .collect(),
        ),
        Value::Object(obj) => {
            if let Some(inner) = obj.get(AND) {
                TestPredicate::And(Box::new(transform_predicate(inner)))
            } else if let Some(inner) = obj.get(OR) {
                TestPredicate::Or(Box::new(transform_predicate(inner)))
            } else if let Some(inner) = obj.get(NOT) {
                TestPredicate::Not(Box::new(transform_predicate(inner)))
            } else {
                transform_leaf(obj)
            }
        }
        _ if !is_truthy(raw) => TestPredicate::default(),
        other => TestPredicate::Unparseable(other.clone()),
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn transform_on(raw: &Value) -> Result<SelectPredicate, DefinitionError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DefinitionError::InvalidSelection {
            message: format!("expected an object, got {}", json_kind(raw)),
        })?;

    let types = obj
        .get(TYPES)
        .ok_or_else(|| DefinitionError::InvalidSelection {
            message: "missing required 'types' key".to_string(),
        })?
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    // The legacy block takes priority when both are present.
    let conditions = match obj.get(MATCH) {
        Some(legacy) => {
            debug!("translating legacy 'match' block into 'conditions'");
            Some(transform_predicate(legacy))
        }
        None => obj.get(CONDITIONS).map(transform_predicate),
    };

    Ok(SelectPredicate { types, conditions })
}

fn transform_leaf(obj: &Map<String, Value>) -> TestPredicate {
    let property = str_field(obj, PROPERTY).or_else(|| str_field(obj, QUERY));
    let operator = str_field(obj, OPERATOR).or_else(|| str_field(obj, OPERATION));

    let params = obj.get(PARAMS);
    let values = obj
        .get(VALUES)
        .and_then(coerce_values)
        .or_else(|| params.and_then(|p| p.get(VALUES)).and_then(coerce_values))
        .or_else(|| {
            params
                .and_then(|p| p.get(VALUE))
                .filter(|v| is_truthy(v))
                .and_then(scalar_string)
                .map(|v| vec![v])
        });

    match property {
        Some(property) => TestPredicate::Property(PropertyPredicate {
            property,
            operator,
            values,
        }),
        None => {
            // Only the reconciled fields survive; legacy names are never written back.
            debug!("predicate has no 'property' or 'query' field, keeping reconciled fields");
            let mut leaf = Map::new();
            if let Some(operator) = operator {
                leaf.insert(OPERATOR.to_string(), Value::String(operator));
            }
            if let Some(values) = values {
                leaf.insert(
                    VALUES.to_string(),
                    Value::Array(values.into_iter().map(Value::String).collect()),
                );
            }
            TestPredicate::Unparseable(Value::Object(leaf))
        }
    }
}

fn parse_actions(raw: &Value) -> Option<TestActions> {
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value::<TestActions>(raw.clone()) {
        Ok(actions) => Some(actions),
        Err(e) => {
            warn!(error = %e, "dropping malformed 'actions' block");
            None
        }
    }
}

fn str_field(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// A values list from a JSON array, or a lone scalar lifted to one element.
fn coerce_values(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::Array(items) => Some(items.iter().filter_map(scalar_string).collect()),
        Value::Null | Value::Object(_) => None,
        scalar => scalar_string(scalar).map(|s| vec![s]),
    }
}

fn scalar_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// JavaScript truthiness, which stored definitions were written against.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

//! Canonical JSON output for test definitions.
//!
//! Output is compact with sorted keys. The serializer never validates;
//! it only guarantees that `on.types` and `rules` are always present.

use serde_json::{json, Map, Value};

use crate::deserialize::is_truthy;
use crate::types::*;

/// Serialize a definition to canonical JSON text.
pub fn serialize(definition: &TestDefinition) -> String {
    to_value(definition).to_string()
}

/// Serialize a definition as indented JSON for display.
pub fn serialize_pretty(definition: &TestDefinition) -> String {
    let value = to_value(definition);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// The canonical JSON value for a definition: exactly `on`, `rules`, and
/// `actions` when present.
pub fn to_value(definition: &TestDefinition) -> Value {
    let mut out = Map::new();
    out.insert(ON.to_string(), definition.on.to_value());
    out.insert(RULES.to_string(), definition.rules.to_value());
    if let Some(actions) = &definition.actions {
        out.insert(ACTIONS.to_string(), json!(actions));
    }
    Value::Object(out)
}

/// Serialize a loosely-typed definition object, filling in defaults.
///
/// - no `on` → `{"types": []}`
/// - `on` without `types` → `on` with `"types": []` added
/// - no `rules` → `[]`
///
/// `actions` is passed through untouched; other top-level keys are dropped.
pub fn serialize_value(raw: &Value) -> String {
    let on = raw.get(ON).filter(|v| is_truthy(v));
    let on = match on {
        Some(Value::Object(on)) if on.get(TYPES).is_some_and(is_truthy) => {
            Value::Object(on.clone())
        }
        Some(Value::Object(on)) => {
            let mut on = on.clone();
            on.insert(TYPES.to_string(), json!([]));
            Value::Object(on)
        }
        _ => json!({ "types": [] }),
    };

    let rules = raw
        .get(RULES)
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| json!([]));

    let mut out = Map::new();
    out.insert(ON.to_string(), on);
    out.insert(RULES.to_string(), rules);
    if let Some(actions) = raw.get(ACTIONS).filter(|v| !v.is_null()) {
        out.insert(ACTIONS.to_string(), actions.clone());
    }
    Value::Object(out).to_string()
}

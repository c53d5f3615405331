//! Shallow structural validation of test definition JSON.
//!
//! Only the top-level shape is checked: an `on` block with a `types`
//! array, and a non-null `rules` block. Nested predicates are validated by
//! the server when the test is saved or evaluated.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::types::{ON, RULES, TYPES};

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse test definition. Please check your YAML.";
pub const MISSING_SELECTION_MESSAGE: &str = "The test is missing selection criteria! ('on')";
pub const INVALID_TYPES_MESSAGE: &str = "The selection criteria is invalid. Invalid types.";
pub const MISSING_RULES_MESSAGE: &str = "The test is missing rules criteria! ('rules')";

/// Result of a shallow validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestValidationResult {
    pub fn valid() -> Self {
        TestValidationResult {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        TestValidationResult {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Validate a JSON-serialized test definition before sending it on.
pub fn validate(json: &str) -> TestValidationResult {
    match serde_json::from_str::<Value>(json) {
        Ok(test) => validate_value(&test),
        Err(e) => {
            debug!(error = %e, "test definition is not valid JSON");
            TestValidationResult::invalid(PARSE_FAILURE_MESSAGE)
        }
    }
}

/// Validate an already-parsed test definition.
pub fn validate_value(test: &Value) -> TestValidationResult {
    let test = match test {
        Value::Object(obj) => obj,
        // An array parses but has no `on` key.
        Value::Array(_) => return TestValidationResult::invalid(MISSING_SELECTION_MESSAGE),
        _ => return TestValidationResult::invalid(PARSE_FAILURE_MESSAGE),
    };
    let Some(on) = test.get(ON) else {
        return TestValidationResult::invalid(MISSING_SELECTION_MESSAGE);
    };
    if !on.get(TYPES).is_some_and(Value::is_array) {
        return TestValidationResult::invalid(INVALID_TYPES_MESSAGE);
    }
    if test.get(RULES).map_or(true, Value::is_null) {
        return TestValidationResult::invalid(MISSING_RULES_MESSAGE);
    }
    TestValidationResult::valid()
}

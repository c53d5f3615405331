//! YAML authoring support. Definitions are stored as JSON; YAML is only
//! an editing surface and is converted before validation.

use serde_json::Value;

use crate::error::DefinitionError;

/// Convert a YAML document into compact JSON text.
pub fn yaml_to_json(yaml: &str) -> Result<String, DefinitionError> {
    let value: Value = serde_yaml::from_str(yaml)?;
    Ok(value.to_string())
}

/// Convert JSON text into a YAML document.
pub fn json_to_yaml(json: &str) -> Result<String, DefinitionError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(serde_yaml::to_string(&value)?)
}

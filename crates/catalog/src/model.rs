//! Catalog record types, as read from TOML.

use serde::{Deserialize, Serialize};

/// A comparison a property predicate can apply, e.g. `exists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unary operators take no `values`.
    #[serde(default)]
    pub unary: bool,
}

/// The operators that apply to one kind of property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub id: String,
    #[serde(default)]
    pub operators: Vec<String>,
}

/// Whether a value picker accepts one value or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    Single,
    Multiple,
}

/// One fixed choice offered by a select input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub display_name: String,
}

/// How values for a property or action are picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SelectMode>,
    /// Entity types to search when values are URNs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

/// A well-supported property of an entity type. Properties form a tree:
/// `children` refine their parent and are searchable by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_options: Option<ValueOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Property>,
}

/// The property tree declared for one entity graph name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProperties {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// An action that may run on passing or failing assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionType {
    pub id: String,
    pub display_name: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_options: Option<ValueOptions>,
}

/// The kind of input used to collect predicate or action values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputType {
    EntitySearch,
    Select,
    TimeSelect,
    Text,
    /// The action takes no values.
    None,
}

/// The value input for a predicate or action, with the options that
/// configure it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueInput<'a> {
    pub input_type: ValueInputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'a ValueOptions>,
}

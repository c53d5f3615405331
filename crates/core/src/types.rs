//! Typed structs representing a deserialized Metadata Test definition.
//!
//! The predicate tree is an explicit tagged union. The storage format
//! dispatches on which of `and`/`or`/`not` is present on an object, and a
//! bare JSON array means "implicit AND"; both rules become variants of
//! [`TestPredicate`] here instead of shape checks at every call site.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

// ── Field names ─────────────────────────────────────────────────────

pub const AND: &str = "and";
pub const OR: &str = "or";
pub const NOT: &str = "not";
pub const ON: &str = "on";
pub const TYPES: &str = "types";
pub const CONDITIONS: &str = "conditions";
pub const RULES: &str = "rules";
pub const ACTIONS: &str = "actions";
pub const PROPERTY: &str = "property";
pub const OPERATOR: &str = "operator";
pub const OPERANDS: &str = "operands";
pub const VALUES: &str = "values";

/// Legacy field names, accepted on read only.
pub mod legacy {
    pub const MATCH: &str = "match";
    pub const QUERY: &str = "query";
    pub const OPERATION: &str = "operation";
    pub const PARAMS: &str = "params";
    pub const VALUE: &str = "value";
}

// ── Property predicate ──────────────────────────────────────────────

/// A single leaf condition over a named asset property.
///
/// A predicate without an `operator` is a draft: the property has been
/// chosen but the comparison is still pending. Drafts may be held and
/// stored, but are not executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPredicate {
    /// Dotted attribute path on the asset (e.g. `__firstSynchronized`).
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Operand list. Absent for unary operators such as `exists`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl PropertyPredicate {
    /// A draft predicate on `property`.
    pub fn new(property: impl Into<String>) -> Self {
        PropertyPredicate {
            property: property.into(),
            operator: None,
            values: None,
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_draft(&self) -> bool {
        self.operator.is_none()
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(PROPERTY.to_string(), Value::String(self.property.clone()));
        if let Some(op) = &self.operator {
            obj.insert(OPERATOR.to_string(), Value::String(op.clone()));
        }
        if let Some(values) = &self.values {
            obj.insert(VALUES.to_string(), json!(values));
        }
        Value::Object(obj)
    }
}

// ── Test predicate ──────────────────────────────────────────────────

/// A compound predicate as it appears in a deserialized definition.
///
/// Combinators wrap another `TestPredicate`, so both `{"and": [...]}` and
/// the singular `{"and": {...}}` are representable and survive a
/// load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum TestPredicate {
    Property(PropertyPredicate),
    And(Box<TestPredicate>),
    Or(Box<TestPredicate>),
    Not(Box<TestPredicate>),
    /// Implicit AND over every element.
    List(Vec<TestPredicate>),
    /// A leaf that carries no usable `property`. Kept verbatim.
    Unparseable(Value),
}

impl Default for TestPredicate {
    fn default() -> Self {
        TestPredicate::List(Vec::new())
    }
}

impl TestPredicate {
    pub fn and(operands: Vec<TestPredicate>) -> Self {
        TestPredicate::And(Box::new(TestPredicate::List(operands)))
    }

    pub fn or(operands: Vec<TestPredicate>) -> Self {
        TestPredicate::Or(Box::new(TestPredicate::List(operands)))
    }

    pub fn not(operands: Vec<TestPredicate>) -> Self {
        TestPredicate::Not(Box::new(TestPredicate::List(operands)))
    }

    /// True for an empty implicit-AND list, the "no conditions" value.
    pub fn is_empty(&self) -> bool {
        matches!(self, TestPredicate::List(items) if items.is_empty())
    }

    pub fn to_value(&self) -> Value {
        match self {
            TestPredicate::Property(p) => p.to_value(),
            TestPredicate::And(inner) => single_key(AND, inner),
            TestPredicate::Or(inner) => single_key(OR, inner),
            TestPredicate::Not(inner) => single_key(NOT, inner),
            TestPredicate::List(items) => {
                Value::Array(items.iter().map(TestPredicate::to_value).collect())
            }
            TestPredicate::Unparseable(raw) => raw.clone(),
        }
    }
}

fn single_key(key: &str, inner: &TestPredicate) -> Value {
    let mut obj = Map::new();
    obj.insert(key.to_string(), inner.to_value());
    Value::Object(obj)
}

impl From<PropertyPredicate> for TestPredicate {
    fn from(p: PropertyPredicate) -> Self {
        TestPredicate::Property(p)
    }
}

impl Serialize for TestPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TestPredicate {
    /// Deserializes through the legacy normalizer, so old field names are
    /// accepted here as well.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(crate::deserialize::transform_predicate(&raw))
    }
}

// ── Selection ───────────────────────────────────────────────────────

/// The `on` block: which assets a test applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectPredicate {
    /// Entity-type graph names (e.g. `dataset`).
    pub types: Vec<String>,
    pub conditions: Option<TestPredicate>,
}

impl SelectPredicate {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectPredicate {
            types: types.into_iter().map(Into::into).collect(),
            conditions: None,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(TYPES.to_string(), json!(self.types));
        if let Some(conditions) = &self.conditions {
            obj.insert(CONDITIONS.to_string(), conditions.to_value());
        }
        Value::Object(obj)
    }
}

// ── Actions ─────────────────────────────────────────────────────────

/// A single action in the actions clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Actions applied to assets that pass or fail the test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestActions {
    #[serde(default)]
    pub passing: Vec<TestAction>,
    #[serde(default)]
    pub failing: Vec<TestAction>,
}

// ── Definition ──────────────────────────────────────────────────────

/// A deserialized Metadata Test definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDefinition {
    pub on: SelectPredicate,
    pub rules: TestPredicate,
    pub actions: Option<TestActions>,
    /// Unknown top-level fields from the source JSON. Carried in memory
    /// only; the serializer writes `on`, `rules`, and `actions`.
    pub extra: Map<String, Value>,
}

impl Default for TestDefinition {
    /// `{"on": {"types": []}, "rules": []}`
    fn default() -> Self {
        TestDefinition {
            on: SelectPredicate::default(),
            rules: TestPredicate::default(),
            actions: None,
            extra: Map::new(),
        }
    }
}

impl Serialize for TestDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::serialize::to_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TestDefinition {
    /// Strict: a definition the normalizer would replace with the default
    /// is reported as an error here.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        crate::deserialize::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

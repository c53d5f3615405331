//! Conversion between stored predicates and the predicate builder form.
//!
//! Stored definitions nest logical operators as object keys:
//!
//! ```json
//! {"and": [
//!     {"property": "entityType", "operator": "equals", "values": ["dataset"]},
//!     {"or": [{"property": "name", "operator": "exists"}]}
//! ]}
//! ```
//!
//! while the interactive builder works on a flattened operator/operand
//! structure:
//!
//! ```json
//! {"operator": "and", "operands": [
//!     {"property": "entityType", "operator": "equals", "values": ["dataset"]},
//!     {"operator": "or", "operands": [{"property": "name", "operator": "exists"}]}
//! ]}
//! ```
//!
//! [`to_logical`] lifts every combinator operand into a list. [`to_test`]
//! always emits list operands, so a stored `{"not": x}` comes back as
//! `{"not": [x]}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::BuilderError;
use crate::types::{json_kind, PropertyPredicate, TestPredicate, OPERANDS, OPERATOR};

/// Logical operators understood by the builder. Property operators such
/// as `exists` share the `operator` field but never this namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl LogicalOperator {
    pub const ALL: [LogicalOperator; 3] =
        [LogicalOperator::And, LogicalOperator::Or, LogicalOperator::Not];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
            LogicalOperator::Not => "not",
        }
    }

    /// Label shown to users, e.g. `AND`.
    pub fn display_name(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
        }
    }

    pub fn parse(s: &str) -> Option<LogicalOperator> {
        LogicalOperator::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical node in builder form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalPredicate {
    pub operator: LogicalOperator,
    pub operands: Vec<LogicalOperand>,
}

/// One operand of a [`LogicalPredicate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogicalOperand {
    Logical(LogicalPredicate),
    Property(PropertyPredicate),
    /// Carried through from [`TestPredicate::Unparseable`].
    Unparseable(Value),
}

impl LogicalOperand {
    /// Parse the builder JSON form.
    ///
    /// Objects whose `operator` is a logical operator are logical nodes; a
    /// missing `operands` is treated as empty, any other non-array is an
    /// error. Other objects are property predicates.
    pub fn from_value(value: &Value) -> Result<LogicalOperand, BuilderError> {
        let obj = value.as_object().ok_or(BuilderError::UnexpectedShape {
            found: json_kind(value),
        })?;

        if let Some(operator) = obj
            .get(OPERATOR)
            .and_then(Value::as_str)
            .and_then(LogicalOperator::parse)
        {
            let operands = match obj.get(OPERANDS) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(LogicalOperand::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(other) => {
                    return Err(BuilderError::OperandsNotArray {
                        operator,
                        found: json_kind(other),
                    })
                }
            };
            return Ok(LogicalOperand::Logical(LogicalPredicate { operator, operands }));
        }

        match serde_json::from_value::<PropertyPredicate>(value.clone()) {
            Ok(p) => Ok(LogicalOperand::Property(p)),
            Err(_) => Ok(LogicalOperand::Unparseable(value.clone())),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, LogicalOperand::Logical(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            LogicalOperand::Logical(l) => l.to_value(),
            LogicalOperand::Property(p) => p.to_value(),
            LogicalOperand::Unparseable(raw) => raw.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for LogicalOperand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        LogicalOperand::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

impl From<LogicalPredicate> for LogicalOperand {
    fn from(l: LogicalPredicate) -> Self {
        LogicalOperand::Logical(l)
    }
}

impl From<PropertyPredicate> for LogicalOperand {
    fn from(p: PropertyPredicate) -> Self {
        LogicalOperand::Property(p)
    }
}

impl LogicalPredicate {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            OPERATOR: self.operator.as_str(),
            OPERANDS: self.operands.iter().map(LogicalOperand::to_value).collect::<Vec<_>>(),
        })
    }

    /// Convert back into the stored form. Operands are always emitted as
    /// a list, even when there is only one.
    pub fn to_test(&self) -> TestPredicate {
        let operands = TestPredicate::List(self.operands.iter().map(to_test).collect());
        match self.operator {
            LogicalOperator::And => TestPredicate::And(Box::new(operands)),
            LogicalOperator::Or => TestPredicate::Or(Box::new(operands)),
            LogicalOperator::Not => TestPredicate::Not(Box::new(operands)),
        }
    }
}

/// True if `predicate` is a logical node rather than a property predicate.
pub fn is_logical_predicate(predicate: &Value) -> bool {
    predicate
        .get(OPERATOR)
        .and_then(Value::as_str)
        .and_then(LogicalOperator::parse)
        .is_some()
}

/// Convert a stored predicate into builder form.
pub fn to_logical(predicate: &TestPredicate) -> LogicalOperand {
    match predicate {
        TestPredicate::List(items) => node(LogicalOperator::And, convert_all(items)),
        TestPredicate::And(inner) => node(LogicalOperator::And, lift(inner)),
        TestPredicate::Or(inner) => node(LogicalOperator::Or, lift(inner)),
        TestPredicate::Not(inner) => node(LogicalOperator::Not, lift(inner)),
        TestPredicate::Property(p) => LogicalOperand::Property(p.clone()),
        TestPredicate::Unparseable(raw) => LogicalOperand::Unparseable(raw.clone()),
    }
}

/// Convert a builder operand back into the stored form.
pub fn to_test(operand: &LogicalOperand) -> TestPredicate {
    match operand {
        LogicalOperand::Logical(l) => l.to_test(),
        LogicalOperand::Property(p) => TestPredicate::Property(p.clone()),
        LogicalOperand::Unparseable(raw) => TestPredicate::Unparseable(raw.clone()),
    }
}

fn node(operator: LogicalOperator, operands: Vec<LogicalOperand>) -> LogicalOperand {
    LogicalOperand::Logical(LogicalPredicate { operator, operands })
}

fn convert_all(items: &[TestPredicate]) -> Vec<LogicalOperand> {
    items.iter().map(to_logical).collect()
}

/// A combinator's operand as a list: list elements, or the single value.
fn lift(inner: &TestPredicate) -> Vec<LogicalOperand> {
    match inner {
        TestPredicate::List(items) => convert_all(items),
        single => vec![to_logical(single)],
    }
}

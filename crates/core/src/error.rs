use crate::builder::LogicalOperator;

/// Why a serialized test definition could not be turned into a
/// [`TestDefinition`](crate::TestDefinition).
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to parse test definition JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to convert test definition YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but is not a JSON object.
    #[error("test definition must be an object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("test is missing required '{field}' block")]
    MissingField { field: String },

    /// The `on` block is present but unusable.
    #[error("invalid selection block: {message}")]
    InvalidSelection { message: String },
}

/// A malformed predicate in the flattened builder form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("expected a predicate object, got {found}")]
    UnexpectedShape { found: &'static str },

    #[error("'{operator}' predicate has operands of type {found}, expected an array")]
    OperandsNotArray {
        operator: LogicalOperator,
        found: &'static str,
    },
}

/// An edit the predicate builder refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("'{operator}' block already has the maximum of {max} {noun}s")]
    TooManyOperands {
        operator: LogicalOperator,
        max: usize,
        noun: String,
    },

    #[error("operand index {index} out of range for block with {len} operands")]
    OperandIndex { index: usize, len: usize },
}

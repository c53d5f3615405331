//! Editing session over a test definition.
//!
//! Every edit returns a new value; nothing is mutated in place. The
//! builder state holds the definition as serialized JSON, exactly as it
//! would be sent to the server on save.

use serde::{Deserialize, Serialize};

use crate::builder::{to_logical, LogicalOperand, LogicalOperator, LogicalPredicate};
use crate::deserialize::deserialize;
use crate::error::EditError;
use crate::serialize::serialize;
use crate::types::{PropertyPredicate, SelectPredicate, TestActions, TestDefinition, TestPredicate};

/// Maximum number of operands in a single block unless configured.
pub const MAX_PREDICATES: usize = 10;

/// Category assigned to new tests.
pub const DEFAULT_TEST_CATEGORY: &str = "Data Governance";

/// Options for a predicate builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Zero means [`MAX_PREDICATES`].
    pub max_predicates: usize,
    /// Noun used in builder labels ("+ Add predicate").
    pub predicate_display_name: String,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            max_predicates: MAX_PREDICATES,
            predicate_display_name: "predicate".to_string(),
        }
    }
}

impl BuilderOptions {
    fn limit(&self) -> usize {
        if self.max_predicates == 0 {
            MAX_PREDICATES
        } else {
            self.max_predicates
        }
    }
}

impl LogicalPredicate {
    pub fn new(operator: LogicalOperator) -> Self {
        LogicalPredicate {
            operator,
            operands: Vec::new(),
        }
    }

    /// The block a builder edits: logical nodes as-is, anything else
    /// wrapped in a single-operand AND.
    pub fn from_operand(operand: LogicalOperand) -> LogicalPredicate {
        match operand {
            LogicalOperand::Logical(l) => l,
            other => LogicalPredicate {
                operator: LogicalOperator::And,
                operands: vec![other],
            },
        }
    }

    /// Builder form of a stored predicate.
    pub fn from_test(predicate: &TestPredicate) -> LogicalPredicate {
        LogicalPredicate::from_operand(to_logical(predicate))
    }

    pub fn can_add_operand(&self, options: &BuilderOptions) -> bool {
        self.operands.len() < options.limit()
    }

    pub fn with_operator(&self, operator: LogicalOperator) -> LogicalPredicate {
        LogicalPredicate {
            operator,
            operands: self.operands.clone(),
        }
    }

    pub fn with_operands(&self, operands: Vec<LogicalOperand>) -> LogicalPredicate {
        LogicalPredicate {
            operator: self.operator,
            operands,
        }
    }

    /// Append a draft predicate on `property`.
    pub fn push_property(
        &self,
        property: impl Into<String>,
        options: &BuilderOptions,
    ) -> Result<LogicalPredicate, EditError> {
        self.push(PropertyPredicate::new(property).into(), options)
    }

    /// Append an empty nested block.
    pub fn push_logical(
        &self,
        operator: LogicalOperator,
        options: &BuilderOptions,
    ) -> Result<LogicalPredicate, EditError> {
        self.push(LogicalPredicate::new(operator).into(), options)
    }

    pub fn replace_operand(
        &self,
        index: usize,
        operand: LogicalOperand,
    ) -> Result<LogicalPredicate, EditError> {
        self.check_index(index)?;
        let mut operands = self.operands.clone();
        operands[index] = operand;
        Ok(self.with_operands(operands))
    }

    pub fn remove_operand(&self, index: usize) -> Result<LogicalPredicate, EditError> {
        self.check_index(index)?;
        let mut operands = self.operands.clone();
        operands.remove(index);
        Ok(self.with_operands(operands))
    }

    fn push(
        &self,
        operand: LogicalOperand,
        options: &BuilderOptions,
    ) -> Result<LogicalPredicate, EditError> {
        if !self.can_add_operand(options) {
            return Err(EditError::TooManyOperands {
                operator: self.operator,
                max: options.limit(),
                noun: options.predicate_display_name.clone(),
            });
        }
        let mut operands = self.operands.clone();
        operands.push(operand);
        Ok(self.with_operands(operands))
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index >= self.operands.len() {
            return Err(EditError::OperandIndex {
                index,
                len: self.operands.len(),
            });
        }
        Ok(())
    }
}

// ── Builder state ───────────────────────────────────────────────────

/// Serialized definition held by the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionState {
    #[serde(default)]
    pub json: Option<String>,
}

/// State of a test builder form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: DefinitionState,
}

impl Default for BuilderState {
    fn default() -> Self {
        BuilderState {
            name: None,
            category: Some(DEFAULT_TEST_CATEGORY.to_string()),
            description: None,
            definition: DefinitionState {
                json: Some(serialize(&TestDefinition::default())),
            },
        }
    }
}

impl BuilderState {
    /// The definition currently held, or the default when the JSON is
    /// missing or unusable.
    pub fn definition(&self) -> TestDefinition {
        deserialize(self.definition.json.as_deref().unwrap_or("{}"))
    }

    pub fn with_definition(&self, definition: &TestDefinition) -> BuilderState {
        BuilderState {
            definition: DefinitionState {
                json: Some(serialize(definition)),
            },
            ..self.clone()
        }
    }

    /// Replace the selected entity types, keeping the selection conditions.
    pub fn with_types(&self, types: Vec<String>) -> BuilderState {
        let current = self.definition();
        let definition = TestDefinition {
            on: SelectPredicate {
                types,
                conditions: current.on.conditions.clone(),
            },
            ..current
        };
        self.with_definition(&definition)
    }

    pub fn with_conditions(&self, predicate: &LogicalPredicate) -> BuilderState {
        let current = self.definition();
        let definition = TestDefinition {
            on: SelectPredicate {
                types: current.on.types.clone(),
                conditions: Some(predicate.to_test()),
            },
            ..current
        };
        self.with_definition(&definition)
    }

    pub fn with_rules(&self, predicate: &LogicalPredicate) -> BuilderState {
        let definition = TestDefinition {
            rules: predicate.to_test(),
            ..self.definition()
        };
        self.with_definition(&definition)
    }

    pub fn with_actions(&self, actions: Option<TestActions>) -> BuilderState {
        let definition = TestDefinition {
            actions,
            ..self.definition()
        };
        self.with_definition(&definition)
    }

    /// Builder form of the selection conditions.
    pub fn selection_predicate(&self) -> LogicalPredicate {
        let definition = self.definition();
        LogicalPredicate::from_test(&definition.on.conditions.unwrap_or_default())
    }

    /// Builder form of the rules.
    pub fn rules_predicate(&self) -> LogicalPredicate {
        LogicalPredicate::from_test(&self.definition().rules)
    }
}

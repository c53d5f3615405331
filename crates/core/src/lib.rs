//! metatest-core: Metadata Test definition model and conversions.
//!
//! A test definition selects a set of data assets (`on`) and evaluates a
//! boolean predicate tree (`rules`) against each of them. This crate moves
//! that tree between three representations:
//!
//! - stored JSON text, including legacy field names on read
//! - the typed [`TestDefinition`] / [`TestPredicate`] model
//! - the flattened [`LogicalPredicate`] form edited by the predicate builder
//!
//! # Public API
//!
//! - [`deserialize()`] / [`try_deserialize()`] -- JSON text to definition
//! - [`serialize()`] / [`serialize_value()`] -- definition to JSON text
//! - [`validate()`] -- shallow fast-fail check of raw JSON text
//! - [`to_logical()`] / [`to_test()`] -- builder form conversions
//! - [`BuilderState`] -- whole-value edits of a serialized definition

pub mod builder;
pub mod deserialize;
pub mod editor;
pub mod error;
pub mod serialize;
pub mod types;
pub mod validate;
pub mod yaml;

// ── Convenience re-exports ──────────────────────────────────────────

pub use builder::{
    is_logical_predicate, to_logical, to_test, LogicalOperand, LogicalOperator, LogicalPredicate,
};
pub use deserialize::{deserialize, from_value, transform_predicate, try_deserialize};
pub use editor::{BuilderOptions, BuilderState, DefinitionState, MAX_PREDICATES};
pub use error::{BuilderError, DefinitionError, EditError};
pub use serialize::{serialize, serialize_pretty, serialize_value};
pub use types::{
    PropertyPredicate, SelectPredicate, TestAction, TestActions, TestDefinition, TestPredicate,
};
pub use validate::{validate, validate_value, TestValidationResult};
pub use yaml::{json_to_yaml, yaml_to_json};

//! metatest-catalog: the lookup tables behind the Metadata Test builder.
//!
//! A [`Catalog`] declares which comparison operators exist, which operators
//! apply to each kind of value, which properties each entity type exposes,
//! and which actions can run on test results. It is loaded from TOML,
//! either the embedded default ([`Catalog::builtin`]) or a file.

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::{find_property, value_types, Catalog};
pub use error::CatalogError;
pub use model::{
    ActionType, EntityProperties, Operator, Property, SelectMode, SelectOption, ValueInput,
    ValueInputType, ValueOptions, ValueType,
};

use std::path::PathBuf;

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("value type '{value_type}' references unknown operator '{operator}'")]
    UnknownOperator { value_type: String, operator: String },

    #[error("{owner} references unknown value type '{value_type}'")]
    UnknownValueType { owner: String, value_type: String },
}

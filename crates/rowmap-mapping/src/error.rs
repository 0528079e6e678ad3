//! Mapping configuration error types.
//!
//! Every variant is raised while a mapping is built, before any row is read.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// An entity used as a collection element or optional to-one target
    /// declares no identity columns.
    #[error("Configuration error: {entity} has no identity columns but is used as {usage}")]
    MissingIdentity { entity: String, usage: String },

    /// Two bindings of one entity share a property name.
    #[error("Configuration error: property '{property}' is declared twice on {entity}")]
    DuplicateProperty { entity: String, property: String },

    /// Two simple bindings (after flattening nested groups) read the same column.
    #[error("Configuration error: column '{column}' is mapped twice on {entity}")]
    DuplicateColumn { entity: String, column: String },

    /// The flattened identity column set contains a column twice.
    #[error("Configuration error: identity column '{column}' is declared twice on {entity}")]
    DuplicateIdentity { entity: String, column: String },

    /// A collection kind other than list or set was requested.
    #[error("Configuration error: unsupported collection kind '{0}'")]
    UnsupportedCollection(String),
}

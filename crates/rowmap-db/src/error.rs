//! Database error types for rowmap-db.

use rowmap_config::ConfigError;
use rowmap_core::ConversionError;
use rowmap_hydrate::HydrateError;
use rowmap_mapping::MappingError;
use rowmap_params::ParamError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL statement failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Named-parameter translation or binding failed.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// An entity mapping is invalid.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Result rows could not be hydrated.
    #[error(transparent)]
    Hydrate(#[from] HydrateError),

    /// A value cannot be written to or read from a column.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

//! Hydration error types.

use rowmap_core::{ConversionError, CursorError};
use rowmap_mapping::MappingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HydrateError {
    /// Reading from the row source failed.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// A converter rejected a value, or an element converter produced null.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The mapping of a requested type could not be resolved.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A composite identity key was partly null under
    /// `IdentityPolicy::RejectPartial`.
    #[error("Partial identity for {entity}: null in {columns:?}")]
    PartialIdentity { entity: String, columns: Vec<String> },
}

//! Cross-cutting error types for rowmap.
//!
//! Errors raised while converting values or reading rows can surface from
//! several crates (mapping, hydration, database adapter), so they live here.
//! Crate-specific errors (`ParamError`, `MappingError`, `HydrateError`,
//! `DatabaseError`) are defined in their own crates and wrap these.

use thiserror::Error;

/// A value could not be converted between its storage and property forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// A collection element converter returned null.
    #[error("Element converter produced null for collection '{property}'")]
    NullElement { property: String },

    /// The value had an unexpected shape for this converter.
    #[error("Cannot convert {found} value: expected {expected}")]
    UnexpectedType { expected: String, found: String },

    /// The value had the right shape but could not be parsed.
    #[error("Invalid value '{value}': {reason}")]
    Invalid { value: String, reason: String },

    /// A hydrated record could not be deserialized into the target type.
    #[error("Failed to deserialize {target}: {reason}")]
    Deserialize { target: String, reason: String },
}

impl ConversionError {
    /// Shorthand for an [`ConversionError::UnexpectedType`] built from a value.
    #[must_use]
    pub fn unexpected(expected: &str, found: &crate::Value) -> Self {
        Self::UnexpectedType {
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }
    }
}

/// Errors reported by a row cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// A value was requested before the first `next_row` or after exhaustion.
    #[error("Cursor is not positioned on a row")]
    NoCurrentRow,

    /// The requested column label is not part of the result.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The requested column index is outside the result width.
    #[error("Column index {index} out of range (width {width})")]
    IndexOutOfRange { index: usize, width: usize },

    /// The row source failed.
    #[error("Row source failed: {0}")]
    Source(String),
}

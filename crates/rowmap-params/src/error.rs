//! Named-parameter error types.

use thiserror::Error;

/// Errors from translating named-parameter SQL or binding values to it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// The SQL text contains a positional `?`; placeholders are generated
    /// by the translator only.
    #[error("Syntax error: literal '?' not allowed (offset {offset})")]
    LiteralPlaceholder { offset: usize },

    /// A `:` is not followed by a valid identifier start.
    #[error("Syntax error: empty or invalid parameter name (offset {offset})")]
    InvalidName { offset: usize },

    /// A value was bound to a name the query does not use.
    #[error("Can't find parameter that matches '{0}'")]
    UnknownParameter(String),

    /// Positional values were requested while some parameters were unset.
    #[error("Unbound parameters: {}", names.join(", "))]
    Unbound { names: Vec<String> },
}

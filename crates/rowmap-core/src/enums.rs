//! Policy enums shared between configuration and the engine crates.
//!
//! All enums use `snake_case` serialization so they can be written directly
//! in TOML or environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::naming::upper_snake_case;

// ---------------------------------------------------------------------------
// ColumnNaming
// ---------------------------------------------------------------------------

/// How a property name becomes a column name when none is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnNaming {
    /// `userId` → `USER_ID`.
    #[default]
    UpperSnake,
    /// `userId` → `user_id`.
    LowerSnake,
    /// The property name is used as written.
    Verbatim,
}

impl ColumnNaming {
    /// Derive the default column name for `property`.
    #[must_use]
    pub fn column_for(self, property: &str) -> String {
        match self {
            Self::UpperSnake => upper_snake_case(property),
            Self::LowerSnake => upper_snake_case(property).to_lowercase(),
            Self::Verbatim => property.to_string(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpperSnake => "upper_snake",
            Self::LowerSnake => "lower_snake",
            Self::Verbatim => "verbatim",
        }
    }
}

impl fmt::Display for ColumnNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ParameterCase
// ---------------------------------------------------------------------------

/// How named parameters are keyed in a translated query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterCase {
    /// Names are case-sensitive, stored as written.
    #[default]
    Preserve,
    /// Names are uppercased at parse time and at lookup time.
    Upper,
}

impl ParameterCase {
    /// Normalize a parameter name for storage or lookup.
    #[must_use]
    pub fn normalize(self, name: &str) -> String {
        match self {
            Self::Preserve => name.to_string(),
            Self::Upper => name.to_uppercase(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Upper => "upper",
        }
    }
}

impl fmt::Display for ParameterCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdentityPolicy
// ---------------------------------------------------------------------------

/// Treatment of composite identity keys where some, but not all, columns are
/// null.
///
/// A key whose columns are all null always means "no entity on this row".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// A partially-null key is a valid, distinct key.
    #[default]
    Lenient,
    /// A partially-null key is a hydration error.
    RejectPartial,
}

impl IdentityPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::RejectPartial => "reject_partial",
        }
    }
}

impl fmt::Display for IdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

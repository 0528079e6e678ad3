//! Property bindings.
//!
//! Each property of a mapped entity is bound one of three ways:
//! - [`SimpleBinding`]: one column, one scalar value
//! - [`NestedBinding`]: another entity's bindings read inline from the same
//!   row, either always present (embedded group) or optional (to-one relation)
//! - [`CollectionBinding`]: a one-to-many relation filled from repeated rows

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rowmap_core::Value;

use crate::convert::SharedConverter;
use crate::error::MappingError;
use crate::mapping::EntityMapping;

#[derive(Debug, Clone)]
pub enum Binding {
    Simple(SimpleBinding),
    Nested(NestedBinding),
    Collection(CollectionBinding),
}

impl Binding {
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Simple(b) => &b.property,
            Self::Nested(b) => &b.property,
            Self::Collection(b) => &b.property,
        }
    }

    #[must_use]
    pub const fn as_simple(&self) -> Option<&SimpleBinding> {
        match self {
            Self::Simple(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimpleBinding {
    pub property: Arc<str>,
    pub column: Arc<str>,
    pub identity: bool,
    pub converter: SharedConverter,
}

#[derive(Debug, Clone)]
pub struct NestedBinding {
    pub property: Arc<str>,
    pub mapping: Arc<EntityMapping>,
    /// `true` for an optional to-one relation: when every identity column
    /// of `mapping` is null the property is null.
    pub nullable_if_identity_null: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionBinding {
    pub property: Arc<str>,
    pub kind: CollectionKind,
    pub element: Arc<EntityMapping>,
    /// Applied to each hydrated element before it is added. Must not
    /// produce null.
    pub element_converter: SharedConverter,
}

/// Shape of a one-to-many property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    /// An empty collection value of this kind.
    #[must_use]
    pub const fn empty(self) -> Value {
        match self {
            Self::List => Value::List(Vec::new()),
            Self::Set => Value::Set(Vec::new()),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" | "vec" => Ok(Self::List),
            "set" | "hashset" => Ok(Self::Set),
            _ => Err(MappingError::UnsupportedCollection(s.to_string())),
        }
    }
}

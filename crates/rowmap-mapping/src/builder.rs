//! Manual mapping registration.
//!
//! ```
//! use std::sync::Arc;
//! use rowmap_mapping::{Column, MappingBuilder, TimestampConverter};
//!
//! let tag = Arc::new(MappingBuilder::new("Tag").id("tagId").column("label").build().unwrap());
//! let post = MappingBuilder::new("Post")
//!     .id("id")
//!     .column("title")
//!     .simple(Column::new("createdAt").converter(TimestampConverter))
//!     .list("tags", tag)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(post.identity_columns()[0].as_ref(), "ID");
//! assert!(post.has_collections());
//! ```

use std::sync::Arc;

use rowmap_core::ColumnNaming;

use crate::binding::{Binding, CollectionBinding, CollectionKind, NestedBinding, SimpleBinding};
use crate::convert::{SharedConverter, ValueConverter, identity};
use crate::error::MappingError;
use crate::mapping::EntityMapping;

/// A simple column binding under construction.
///
/// Without [`Column::named`] the column name is derived from the property
/// through the builder's [`ColumnNaming`].
#[derive(Debug, Clone)]
pub struct Column {
    property: Arc<str>,
    column: Option<Arc<str>>,
    identity: bool,
    converter: Option<SharedConverter>,
}

impl Column {
    #[must_use]
    pub fn new(property: impl Into<Arc<str>>) -> Self {
        Self {
            property: property.into(),
            column: None,
            identity: false,
            converter: None,
        }
    }

    /// Read from `column` instead of the derived name.
    #[must_use]
    pub fn named(mut self, column: impl Into<Arc<str>>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Mark the column as part of the entity's identity.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    #[must_use]
    pub fn converter(self, converter: impl ValueConverter + 'static) -> Self {
        self.shared_converter(Arc::new(converter))
    }

    #[must_use]
    pub fn shared_converter(mut self, converter: SharedConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    fn resolve(self, naming: ColumnNaming) -> SimpleBinding {
        let column = self
            .column
            .unwrap_or_else(|| naming.column_for(&self.property).into());
        SimpleBinding {
            property: self.property,
            column,
            identity: self.identity,
            converter: self.converter.unwrap_or_else(identity),
        }
    }
}

/// A one-to-many binding under construction.
#[derive(Debug, Clone)]
pub struct Collection {
    property: Arc<str>,
    kind: CollectionKind,
    element: Arc<EntityMapping>,
    element_converter: Option<SharedConverter>,
}

impl Collection {
    #[must_use]
    pub fn new(property: impl Into<Arc<str>>, kind: CollectionKind, element: Arc<EntityMapping>) -> Self {
        Self {
            property: property.into(),
            kind,
            element,
            element_converter: None,
        }
    }

    #[must_use]
    pub fn list(property: impl Into<Arc<str>>, element: Arc<EntityMapping>) -> Self {
        Self::new(property, CollectionKind::List, element)
    }

    #[must_use]
    pub fn set(property: impl Into<Arc<str>>, element: Arc<EntityMapping>) -> Self {
        Self::new(property, CollectionKind::Set, element)
    }

    /// Build from a textual collection kind (`list`, `set`, ...).
    ///
    /// # Errors
    ///
    /// Returns `MappingError::UnsupportedCollection` for any other kind.
    pub fn parse(
        property: impl Into<Arc<str>>,
        kind: &str,
        element: Arc<EntityMapping>,
    ) -> Result<Self, MappingError> {
        Ok(Self::new(property, kind.parse()?, element))
    }

    /// Convert each hydrated element before it is added.
    #[must_use]
    pub fn element_converter(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.element_converter = Some(Arc::new(converter));
        self
    }

    fn resolve(self) -> CollectionBinding {
        CollectionBinding {
            property: self.property,
            kind: self.kind,
            element: self.element,
            element_converter: self.element_converter.unwrap_or_else(identity),
        }
    }
}

#[derive(Debug)]
enum Pending {
    Simple(Column),
    Ready(Binding),
}

/// Declares the bindings of one entity, in property order.
///
/// Column names are resolved when [`MappingBuilder::build`] runs, so
/// [`MappingBuilder::with_naming`] may be called at any point.
#[derive(Debug)]
pub struct MappingBuilder {
    name: Arc<str>,
    naming: ColumnNaming,
    bindings: Vec<Pending>,
}

impl MappingBuilder {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            naming: ColumnNaming::default(),
            bindings: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_naming(mut self, naming: ColumnNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Identity column with the derived name.
    #[must_use]
    pub fn id(self, property: impl Into<Arc<str>>) -> Self {
        self.simple(Column::new(property).identity())
    }

    /// Plain column with the derived name.
    #[must_use]
    pub fn column(self, property: impl Into<Arc<str>>) -> Self {
        self.simple(Column::new(property))
    }

    #[must_use]
    pub fn simple(mut self, column: Column) -> Self {
        self.bindings.push(Pending::Simple(column));
        self
    }

    /// Embedded group: always present, its identity joins this entity's.
    #[must_use]
    pub fn nested(self, property: impl Into<Arc<str>>, mapping: Arc<EntityMapping>) -> Self {
        self.push_nested(property.into(), mapping, false)
    }

    /// Optional to-one relation: null when its identity columns are all null.
    #[must_use]
    pub fn to_one(self, property: impl Into<Arc<str>>, mapping: Arc<EntityMapping>) -> Self {
        self.push_nested(property.into(), mapping, true)
    }

    #[must_use]
    pub fn list(self, property: impl Into<Arc<str>>, element: Arc<EntityMapping>) -> Self {
        self.collection(Collection::list(property, element))
    }

    #[must_use]
    pub fn set(self, property: impl Into<Arc<str>>, element: Arc<EntityMapping>) -> Self {
        self.collection(Collection::set(property, element))
    }

    #[must_use]
    pub fn collection(mut self, collection: Collection) -> Self {
        self.bindings
            .push(Pending::Ready(Binding::Collection(collection.resolve())));
        self
    }

    fn push_nested(mut self, property: Arc<str>, mapping: Arc<EntityMapping>, optional: bool) -> Self {
        self.bindings.push(Pending::Ready(Binding::Nested(NestedBinding {
            property,
            mapping,
            nullable_if_identity_null: optional,
        })));
        self
    }

    /// Resolve column names and validate.
    ///
    /// # Errors
    ///
    /// See [`EntityMapping::new`].
    pub fn build(self) -> Result<EntityMapping, MappingError> {
        let naming = self.naming;
        let bindings = self
            .bindings
            .into_iter()
            .map(|pending| match pending {
                Pending::Simple(column) => Binding::Simple(column.resolve(naming)),
                Pending::Ready(binding) => binding,
            })
            .collect();
        EntityMapping::new(self.name, bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::BoolIntConverter;
    use pretty_assertions::assert_eq;
    use rowmap_core::Value;

    fn columns(mapping: &EntityMapping) -> Vec<String> {
        mapping
            .bindings()
            .iter()
            .filter_map(Binding::as_simple)
            .map(|b| b.column.to_string())
            .collect()
    }

    #[test]
    fn default_naming_is_upper_snake() {
        let mapping = MappingBuilder::new("User")
            .id("userId")
            .column("displayName")
            .build()
            .unwrap();
        assert_eq!(columns(&mapping), vec!["USER_ID", "DISPLAY_NAME"]);
        assert!(mapping.is_flat());
    }

    #[test]
    fn naming_applies_regardless_of_call_order() {
        let mapping = MappingBuilder::new("User")
            .column("displayName")
            .with_naming(ColumnNaming::LowerSnake)
            .simple(Column::new("email").named("MAIL_ADDR"))
            .build()
            .unwrap();
        assert_eq!(columns(&mapping), vec!["display_name", "MAIL_ADDR"]);
    }

    #[test]
    fn configured_converter_is_kept() {
        let mapping = MappingBuilder::new("Flag")
            .simple(Column::new("active").converter(BoolIntConverter))
            .build()
            .unwrap();
        let (_, binding) = mapping.simple_by_column("active").unwrap();
        assert_eq!(
            binding.converter.from_storage(Value::Int(1)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn textual_collection_kind() {
        let tag = Arc::new(MappingBuilder::new("Tag").id("id").build().unwrap());
        let set = Collection::parse("tags", "HashSet", Arc::clone(&tag)).unwrap();
        assert_eq!(set.kind, CollectionKind::Set);
        assert_eq!(
            Collection::parse("tags", "deque", tag).unwrap_err(),
            MappingError::UnsupportedCollection("deque".into())
        );
    }
}

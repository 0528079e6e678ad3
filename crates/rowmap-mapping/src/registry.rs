//! Per-type mapping cache.
//!
//! Types opt in by implementing [`Entity`]. The registry resolves a type's
//! mapping once and shares it through `Arc` afterwards. Resolution runs
//! outside the lock, so `describe` may itself ask the registry for the
//! mappings of nested and element types. Two threads racing on the same type
//! may both build it; the first insert wins and both get that mapping.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rowmap_core::ColumnNaming;

use crate::builder::MappingBuilder;
use crate::error::MappingError;
use crate::mapping::EntityMapping;

/// A type with a mapping description.
pub trait Entity: 'static {
    /// Describe the mapping of `Self`. Use [`MappingRegistry::builder`] so the
    /// registry's column naming applies, and [`MappingRegistry::mapping_of`]
    /// for related types.
    ///
    /// # Errors
    ///
    /// Returns `MappingError` when the description is invalid.
    fn describe(registry: &MappingRegistry) -> Result<EntityMapping, MappingError>;
}

#[derive(Debug, Default)]
pub struct MappingRegistry {
    naming: ColumnNaming,
    mappings: RwLock<HashMap<TypeId, Arc<EntityMapping>>>,
}

impl MappingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_naming(naming: ColumnNaming) -> Self {
        Self {
            naming,
            mappings: RwLock::default(),
        }
    }

    #[must_use]
    pub const fn naming(&self) -> ColumnNaming {
        self.naming
    }

    /// A builder preset with this registry's column naming.
    #[must_use]
    pub fn builder(&self, name: &str) -> MappingBuilder {
        MappingBuilder::new(name).with_naming(self.naming)
    }

    /// Resolve (or fetch the cached) mapping of `T`.
    ///
    /// # Errors
    ///
    /// Returns the `MappingError` from `T::describe`. Failures are not cached.
    pub fn mapping_of<T: Entity>(&self) -> Result<Arc<EntityMapping>, MappingError> {
        if let Some(mapping) = self.get::<T>() {
            return Ok(mapping);
        }

        let built = Arc::new(T::describe(self)?);
        tracing::debug!(ty = type_name::<T>(), entity = built.name(), "resolved mapping");

        let mut map = self
            .mappings
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(Arc::clone(map.entry(TypeId::of::<T>()).or_insert(built)))
    }

    /// Store a mapping for `T` built elsewhere, replacing any cached one.
    pub fn register<T: Entity>(&self, mapping: EntityMapping) -> Arc<EntityMapping> {
        let mapping = Arc::new(mapping);
        self.mappings
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(TypeId::of::<T>(), Arc::clone(&mapping));
        mapping
    }

    /// The cached mapping of `T`, without resolving it.
    #[must_use]
    pub fn get<T: Entity>(&self) -> Option<Arc<EntityMapping>> {
        self.mappings
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

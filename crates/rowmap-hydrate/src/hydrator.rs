//! Typed hydration.

use std::sync::Arc;

use rowmap_core::{IdentityPolicy, Record};
use rowmap_mapping::{Entity, MappingRegistry};
use serde::de::DeserializeOwned;

use crate::cursor::RowCursor;
use crate::engine::{HydrateOptions, hydrate_all_with, hydrate_one_with};
use crate::error::HydrateError;

/// Hydrates [`Entity`] types through a shared [`MappingRegistry`], then
/// deserializes the records into `T`.
#[derive(Debug, Clone, Default)]
pub struct Hydrator {
    registry: Arc<MappingRegistry>,
    options: HydrateOptions,
}

impl Hydrator {
    #[must_use]
    pub const fn new(registry: Arc<MappingRegistry>) -> Self {
        Self {
            registry,
            options: HydrateOptions::new(IdentityPolicy::Lenient),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: HydrateOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn options(&self) -> HydrateOptions {
        self.options
    }

    /// Records of `T`'s mapping, without deserializing.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Mapping` when `T`'s mapping is invalid, or any
    /// hydration error.
    pub fn records<T: Entity, C: RowCursor + ?Sized>(
        &self,
        cursor: &mut C,
    ) -> Result<Vec<Record>, HydrateError> {
        let mapping = self.registry.mapping_of::<T>()?;
        hydrate_all_with(cursor, &mapping, self.options)
    }

    /// Every `T` the cursor yields.
    ///
    /// # Errors
    ///
    /// As [`Hydrator::records`], plus `ConversionError::Deserialize` when a
    /// record does not fit `T`.
    pub fn all<T, C>(&self, cursor: &mut C) -> Result<Vec<T>, HydrateError>
    where
        T: Entity + DeserializeOwned,
        C: RowCursor + ?Sized,
    {
        self.records::<T, C>(cursor)?
            .iter()
            .map(|record| record.deserialize().map_err(HydrateError::from))
            .collect()
    }

    /// The first `T`, if any.
    ///
    /// # Errors
    ///
    /// As [`Hydrator::all`].
    pub fn one<T, C>(&self, cursor: &mut C) -> Result<Option<T>, HydrateError>
    where
        T: Entity + DeserializeOwned,
        C: RowCursor + ?Sized,
    {
        let mapping = self.registry.mapping_of::<T>()?;
        hydrate_one_with(cursor, &mapping, self.options)?
            .map(|record| record.deserialize().map_err(HydrateError::from))
            .transpose()
    }
}

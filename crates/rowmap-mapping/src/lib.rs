//! # rowmap-mapping
//!
//! How entities relate to result-set columns.
//!
//! - [`Binding`]: simple column, nested group or one-to-many collection
//! - [`EntityMapping`]: validated, immutable bindings plus the derived views
//!   hydration needs (identity columns, flatness, reachable collections)
//! - [`MappingBuilder`]: manual registration with default column naming
//! - [`ValueConverter`] and the stock converters
//! - [`MappingRegistry`]: thread-safe per-type cache for [`Entity`] types
//!
//! Every configuration problem surfaces as a [`MappingError`] while the
//! mapping is built, never while rows are read.

pub mod binding;
pub mod builder;
pub mod convert;
pub mod error;
pub mod mapping;
mod params;
pub mod registry;

pub use binding::{Binding, CollectionBinding, CollectionKind, NestedBinding, SimpleBinding};
pub use builder::{Collection, Column, MappingBuilder};
pub use convert::{
    BoolIntConverter, EnumTextConverter, IdentityConverter, JsonTextConverter, SharedConverter,
    TimestampConverter, ValueConverter, WriterContext,
};
pub use error::MappingError;
pub use mapping::{CollectionSlot, EntityMapping};
pub use registry::{Entity, MappingRegistry};

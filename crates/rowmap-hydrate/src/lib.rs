//! # rowmap-hydrate
//!
//! Rebuilds object trees from flattened, joined result rows.
//!
//! Given a [`RowCursor`] and an [`EntityMapping`](rowmap_mapping::EntityMapping),
//! [`hydrate_all`] produces one [`Record`](rowmap_core::Record) per root
//! object. Nested one-to-one groups are read from the same row; one-to-many
//! collections are reconstructed across rows through an identity map so that
//! every distinct object is built once and every child is added to a given
//! parent once, however many rows repeat it.
//!
//! [`Hydrator`] adds mapping resolution through a
//! [`MappingRegistry`](rowmap_mapping::MappingRegistry) and serde
//! deserialization into typed values.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod hydrator;
pub mod identity;

pub use cursor::{MemoryCursor, RowCursor};
pub use engine::{
    HydrateOptions, hydrate_all, hydrate_all_with, hydrate_one, hydrate_one_with, hydrate_scalar,
};
pub use error::HydrateError;
pub use hydrator::Hydrator;
pub use identity::IdentityKey;

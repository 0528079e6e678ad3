//! # rowmap-core
//!
//! Core types shared by every rowmap crate.
//!
//! - [`Value`]: the dynamic value universe used for raw column values and
//!   hydrated property values alike
//! - [`Record`]: a hydrated object, an ordered list of named properties
//! - Default column naming ([`naming::upper_snake_case`])
//! - Policy enums consumed by configuration
//! - Cross-cutting error types
//! - [`Page`] for paged result content

pub mod enums;
pub mod errors;
pub mod naming;
pub mod page;
pub mod record;
pub mod value;

pub use enums::{ColumnNaming, IdentityPolicy, ParameterCase};
pub use errors::{ConversionError, CursorError};
pub use page::Page;
pub use record::Record;
pub use value::Value;

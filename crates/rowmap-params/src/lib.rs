//! # rowmap-params
//!
//! Named-parameter SQL for positional-placeholder drivers.
//!
//! Callers write `:name` placeholders; [`NamedParameterQuery`] translates
//! them to `?` and records, per name, every 1-based position it occupies.
//! [`ParameterValues`] binds values by name and produces the positional
//! list a driver expects. [`NpSqlBuilder`] assembles dynamic SQL fragments
//! together with their values.
//!
//! ```
//! use rowmap_params::{NamedParameterQuery, ParameterValues};
//!
//! let query = NamedParameterQuery::parse("SELECT * FROM t WHERE a = :a OR b = :a").unwrap();
//! assert_eq!(query.translated_query(), "SELECT * FROM t WHERE a = ? OR b = ?");
//!
//! let mut values = ParameterValues::new(query);
//! values.set("a", 1).unwrap();
//! let (_sql, positional) = values.into_positional().unwrap();
//! assert_eq!(positional.len(), 2);
//! ```

mod builder;
mod error;
mod query;
mod values;

pub use builder::NpSqlBuilder;
pub use error::ParamError;
pub use query::NamedParameterQuery;
pub use values::ParameterValues;

//! Dynamic named-parameter SQL assembly.

use rowmap_core::{ParameterCase, Value};

use crate::error::ParamError;
use crate::query::NamedParameterQuery;
use crate::values::ParameterValues;

/// Builds SQL from fragments while collecting the values of the named
/// parameters those fragments mention.
///
/// ```
/// use rowmap_params::NpSqlBuilder;
///
/// let mut builder = NpSqlBuilder::new("SELECT * FROM users WHERE 1 = 1");
/// let name = Some("ann");
/// if let Some(name) = name {
///     builder.append(" AND name = :name").param("name", name);
/// }
/// let (sql, values) = builder.build().unwrap().into_positional().unwrap();
/// assert_eq!(sql, "SELECT * FROM users WHERE 1 = 1 AND name = ?");
/// assert_eq!(values.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NpSqlBuilder {
    sql: String,
    values: Vec<(String, Value)>,
    case: ParameterCase,
}

impl NpSqlBuilder {
    #[must_use]
    pub fn new(start: &str) -> Self {
        Self {
            sql: start.to_string(),
            values: Vec::new(),
            case: ParameterCase::Preserve,
        }
    }

    #[must_use]
    pub const fn with_case(mut self, case: ParameterCase) -> Self {
        self.case = case;
        self
    }

    pub fn append(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Record a value for `name`. A later value for the same name wins.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.values.push((name.to_string(), value.into()));
        self
    }

    /// Record several values.
    pub fn params<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.param(name.as_ref(), value);
        }
        self
    }

    /// The named-parameter SQL assembled so far.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        &self.sql
    }

    /// Translate the assembled SQL and bind the recorded values.
    ///
    /// # Errors
    ///
    /// Returns a syntax error from translation, or `UnknownParameter` when a
    /// recorded value names a parameter the SQL never mentions.
    pub fn build(self) -> Result<ParameterValues, ParamError> {
        let query = NamedParameterQuery::parse_with(&self.sql, self.case)?;
        let mut values = ParameterValues::new(query);
        values.set_all(self.values)?;
        Ok(values)
    }
}

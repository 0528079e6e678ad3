//! Named-parameter statements bound to a libSQL connection.

use std::fmt;

use rowmap_core::{Record, Value};
use rowmap_hydrate::{MemoryCursor, hydrate_all_with, hydrate_scalar};
use rowmap_mapping::{Entity, EntityMapping};
use rowmap_params::ParameterValues;
use serde::de::DeserializeOwned;

use crate::RowmapDb;
use crate::bridge::{buffer_rows, to_libsql};
use crate::error::DatabaseError;

/// A translated query plus its parameter values, ready to run on the
/// connection it was prepared on.
///
/// Running a statement does not consume it, so it can be re-bound and run
/// again.
pub struct NpStatement<'db> {
    db: &'db RowmapDb,
    values: ParameterValues,
}

impl fmt::Debug for NpStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NpStatement")
            .field("sql", &self.sql())
            .field("unbound", &self.values.unbound_names())
            .finish_non_exhaustive()
    }
}

impl<'db> NpStatement<'db> {
    pub(crate) const fn new(db: &'db RowmapDb, values: ParameterValues) -> Self {
        Self { db, values }
    }

    /// The positional SQL sent to libSQL.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.values.query().translated_query()
    }

    /// Bind `value` to every occurrence of `:name`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Param` when the query has no such parameter.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, DatabaseError> {
        self.values.set(name, value)?;
        Ok(self)
    }

    /// Bind every `(name, value)` pair.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown name.
    pub fn set_map<I, K, V>(&mut self, pairs: I) -> Result<&mut Self, DatabaseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.values.set_all(pairs)?;
        Ok(self)
    }

    /// Bind the storage values of `record`'s simple columns, one parameter
    /// per column name.
    ///
    /// # Errors
    ///
    /// Returns a conversion error from a column converter, or
    /// `DatabaseError::Param` when the query lacks a parameter for one of
    /// the columns.
    pub fn set_record(
        &mut self,
        mapping: &EntityMapping,
        record: &Record,
    ) -> Result<&mut Self, DatabaseError> {
        let params = mapping.parameters(record)?;
        self.set_map(params)
    }

    /// [`NpStatement::set_record`] with the mapping of `T`.
    ///
    /// # Errors
    ///
    /// As [`NpStatement::set_record`], plus mapping resolution errors.
    pub fn set_entity<T: Entity>(&mut self, record: &Record) -> Result<&mut Self, DatabaseError> {
        let mapping = self.db.registry().mapping_of::<T>()?;
        self.set_record(&mapping, record)
    }

    fn positional(&self) -> Result<(String, Vec<libsql::Value>), DatabaseError> {
        let values = self.values.clone();
        let (sql, values) = if self.db.require_all_bound() {
            values.into_positional()?
        } else {
            values.into_positional_lenient()
        };
        let values = values
            .into_iter()
            .map(to_libsql)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((sql, values))
    }

    /// Run a statement that returns no rows. Returns the affected row count.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if binding or execution fails.
    pub async fn execute(&self) -> Result<u64, DatabaseError> {
        let (sql, values) = self.positional()?;
        tracing::debug!(%sql, params = values.len(), "execute");
        let changed = self
            .db
            .conn()
            .execute(&sql, libsql::params_from_iter(values))
            .await?;
        Ok(changed)
    }

    /// Run the query and buffer its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if binding, execution or fetching fails.
    pub async fn query_cursor(&self) -> Result<MemoryCursor, DatabaseError> {
        let (sql, values) = self.positional()?;
        tracing::debug!(%sql, params = values.len(), "query");
        let rows = self
            .db
            .conn()
            .query(&sql, libsql::params_from_iter(values))
            .await?;
        buffer_rows(rows).await
    }

    /// Hydrated records of `mapping`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or hydration fails.
    pub async fn query_records(&self, mapping: &EntityMapping) -> Result<Vec<Record>, DatabaseError> {
        let mut cursor = self.query_cursor().await?;
        Ok(hydrate_all_with(&mut cursor, mapping, self.db.hydrator().options())?)
    }

    /// Every `T` the query yields.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query, hydration or deserialization
    /// fails.
    pub async fn query_list<T: Entity + DeserializeOwned>(&self) -> Result<Vec<T>, DatabaseError> {
        let mut cursor = self.query_cursor().await?;
        Ok(self.db.hydrator().all::<T, _>(&mut cursor)?)
    }

    /// The first `T` the query yields, if any.
    ///
    /// # Errors
    ///
    /// As [`NpStatement::query_list`].
    pub async fn query_one<T: Entity + DeserializeOwned>(&self) -> Result<Option<T>, DatabaseError> {
        let mut cursor = self.query_cursor().await?;
        Ok(self.db.hydrator().one::<T, _>(&mut cursor)?)
    }

    /// The first column of the first row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` when the query yields no rows.
    pub async fn query_scalar(&self) -> Result<Value, DatabaseError> {
        let mut cursor = self.query_cursor().await?;
        hydrate_scalar(&mut cursor)?.ok_or(DatabaseError::NoResult)
    }
}

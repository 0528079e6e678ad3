//! # rowmap-db
//!
//! libSQL adapter for rowmap.
//!
//! [`RowmapDb`] owns a local libSQL database and connection plus the
//! configured mapping registry and hydration settings. Statements are
//! written with `:name` parameters and prepared with [`RowmapDb::prepare`];
//! the resulting [`NpStatement`] binds values by name and hydrates results
//! into records or typed entities.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod bridge;
pub mod error;
pub mod statement;

use std::sync::Arc;

use libsql::Builder;
use rowmap_config::RowmapConfig;
use rowmap_core::ParameterCase;
use rowmap_hydrate::{HydrateOptions, Hydrator};
use rowmap_mapping::MappingRegistry;
use rowmap_params::{NamedParameterQuery, NpSqlBuilder, ParameterValues};

pub use error::DatabaseError;
pub use statement::NpStatement;

/// Database handle for named-parameter statements and hydrated queries.
pub struct RowmapDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    hydrator: Hydrator,
    case: ParameterCase,
    require_all_bound: bool,
}

impl RowmapDb {
    /// Open a local database at `path` (or `:memory:`) with default settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let mut config = RowmapConfig::default();
        config.database.path = path.to_string();
        Self::from_config(&config).await
    }

    /// Open the database described by `config` and apply its naming,
    /// parameter and hydration settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the
    /// foreign-key pragma fails.
    pub async fn from_config(config: &RowmapConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.database.path).build().await?;
        let conn = db.connect()?;

        if config.database.foreign_keys {
            // Per-connection in SQLite
            conn.execute("PRAGMA foreign_keys = ON", ())
                .await
                .map_err(|e| DatabaseError::Query(format!("PRAGMA foreign_keys: {e}")))?;
        }

        let registry = Arc::new(MappingRegistry::with_naming(config.naming.columns));
        let hydrator = Hydrator::new(registry)
            .with_options(HydrateOptions::new(config.hydrate.identity_policy));

        tracing::debug!(
            path = %config.database.path,
            naming = %config.naming.columns,
            case = %config.params.case,
            identity_policy = %config.hydrate.identity_policy,
            "opened rowmap database"
        );

        Ok(Self {
            db,
            conn,
            hydrator,
            case: config.params.case,
            require_all_bound: config.params.require_all_bound,
        })
    }

    /// Load configuration (files, environment, `.env`) and open the database
    /// it names.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Config` if configuration is invalid, otherwise
    /// as [`RowmapDb::from_config`].
    pub async fn from_env() -> Result<Self, DatabaseError> {
        let config = RowmapConfig::load_with_dotenv()?;
        Self::from_config(&config).await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub fn registry(&self) -> &MappingRegistry {
        self.hydrator.registry()
    }

    #[must_use]
    pub const fn hydrator(&self) -> &Hydrator {
        &self.hydrator
    }

    #[must_use]
    pub const fn parameter_case(&self) -> ParameterCase {
        self.case
    }

    #[must_use]
    pub const fn require_all_bound(&self) -> bool {
        self.require_all_bound
    }

    /// Translate `sql` and prepare a statement on this connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Param` for a literal `?` or a malformed
    /// parameter name.
    pub fn prepare(&self, sql: &str) -> Result<NpStatement<'_>, DatabaseError> {
        let query = NamedParameterQuery::parse_with(sql, self.case)?;
        Ok(NpStatement::new(self, ParameterValues::new(query)))
    }

    /// Prepare the SQL and values assembled by `builder`.
    ///
    /// # Errors
    ///
    /// As [`NpSqlBuilder::build`].
    pub fn prepare_built(&self, builder: NpSqlBuilder) -> Result<NpStatement<'_>, DatabaseError> {
        let values = builder.with_case(self.case).build()?;
        Ok(NpStatement::new(self, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowmap_core::{ColumnNaming, IdentityPolicy};

    #[tokio::test]
    async fn open_local_uses_defaults() {
        let db = RowmapDb::open_local(":memory:").await.unwrap();
        assert_eq!(db.parameter_case(), ParameterCase::Preserve);
        assert!(db.require_all_bound());
        assert_eq!(db.registry().naming(), ColumnNaming::UpperSnake);
        assert_eq!(db.hydrator().options().identity_policy, IdentityPolicy::Lenient);
    }

    #[tokio::test]
    async fn config_settings_are_applied() {
        let mut config = RowmapConfig::default();
        config.naming.columns = ColumnNaming::LowerSnake;
        config.params.case = ParameterCase::Upper;
        config.hydrate.identity_policy = IdentityPolicy::RejectPartial;
        let db = RowmapDb::from_config(&config).await.unwrap();

        assert_eq!(db.registry().naming(), ColumnNaming::LowerSnake);
        assert_eq!(
            db.hydrator().options().identity_policy,
            IdentityPolicy::RejectPartial
        );
        let stmt = db.prepare("SELECT :a, :A").unwrap();
        assert_eq!(stmt.sql(), "SELECT ?, ?");
    }

    #[tokio::test]
    async fn connection_is_usable_directly() {
        let db = RowmapDb::open_local(":memory:").await.unwrap();
        let mut rows = db.conn().query("SELECT 1", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}

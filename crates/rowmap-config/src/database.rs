//! Local libSQL database configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ":memory:".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the local database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Enable `PRAGMA foreign_keys` on open.
    #[serde(default)]
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            foreign_keys: false,
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

//! # rowmap-config
//!
//! Layered configuration loading for rowmap using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ROWMAP_*` prefix, `__` as separator)
//! 2. Project-level `.rowmap/config.toml`
//! 3. User-level `~/.config/rowmap/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ROWMAP_PARAMS__CASE` -> `params.case`,
//! `ROWMAP_HYDRATE__IDENTITY_POLICY` -> `hydrate.identity_policy`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rowmap_config::RowmapConfig;
//!
//! let config = RowmapConfig::load_with_dotenv().expect("config");
//! println!("parameter case: {}", config.params.case);
//! ```

mod database;
mod error;
mod hydrate;
mod naming;
mod params;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use hydrate::HydrateConfig;
pub use naming::NamingConfig;
pub use params::ParamsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RowmapConfig {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub params: ParamsConfig,
    #[serde(default)]
    pub hydrate: HydrateConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl RowmapConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".rowmap/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ROWMAP_").split("__"))
    }

    /// Reject values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rowmap").join("config.toml"))
    }

    /// Load `.env` from the workspace root, or the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

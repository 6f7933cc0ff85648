//! # retro-config
//!
//! Layered configuration loading for Retrograde using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RETROGRADE_*` prefix, `__` as separator)
//! 2. `./retrograde.toml` in the working directory
//! 3. User-level `~/.config/retrograde/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RETROGRADE_GENERAL__STATE_DIR` -> `general.state_dir`,
//! `RETROGRADE_LOCK__TIMEOUT_SECS` -> `lock.timeout_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use retro_config::RetroConfig;
//!
//! let config = RetroConfig::load_with_dotenv().expect("config");
//! let state_dir = config.general.resolved_state_dir().expect("state dir");
//! println!("orbits live in {}", state_dir.display());
//! ```

mod error;
mod fetch;
mod general;
mod lock;

pub use error::ConfigError;
pub use fetch::FetchConfig;
pub use general::{APP_DIR_NAME, GeneralConfig};
pub use lock::LockConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the working-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "retrograde.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RetroConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl RetroConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("RETROGRADE_").split("__"))
    }

    /// Reject values that would make lock waits or fetches unusable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock.timeout_secs == Some(0) {
            return Err(invalid("lock.timeout_secs", "must be greater than zero"));
        }
        if self.lock.retry_delay_ms == 0 {
            return Err(invalid("lock.retry_delay_ms", "must be greater than zero"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(invalid("fetch.timeout_secs", "must be greater than zero"));
        }
        if self.fetch.max_response_bytes == 0 {
            return Err(invalid(
                "fetch.max_response_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

//! General application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application name used for platform directories.
pub const APP_DIR_NAME: &str = "retrograde";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Root directory holding one sub-directory per orbit.
    ///
    /// Empty means the platform state directory (`~/.local/state/retrograde`
    /// on Linux).
    #[serde(default)]
    pub state_dir: String,
}

impl GeneralConfig {
    /// Resolve the directory orbits live in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoStateDir` if nothing is configured and the
    /// platform offers neither a state nor a local data directory.
    pub fn resolved_state_dir(&self) -> Result<PathBuf, ConfigError> {
        if !self.state_dir.is_empty() {
            return Ok(PathBuf::from(&self.state_dir));
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoStateDir)
    }
}

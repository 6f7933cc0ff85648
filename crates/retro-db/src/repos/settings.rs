//! Settings repository.
//!
//! Settings are written once at orbit creation by a single writer and are
//! read-only afterwards, so they are not locked.

use retro_core::Settings;
use retro_core::urls::normalize_url;

use crate::error::StoreError;
use crate::records::{read_json, write_json};
use crate::store::OrbitStore;

impl OrbitStore {
    /// Create the orbit directory and write its settings.
    ///
    /// The base URL is normalized before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for an invalid base URL and I/O errors.
    pub fn init_settings(&self, settings: &Settings) -> Result<Settings, StoreError> {
        let settings = Settings::new(settings.name.clone(), normalize_url(&settings.base_url)?);
        std::fs::create_dir_all(self.dir()).map_err(StoreError::io(self.dir()))?;
        write_json(&self.settings_path(), &settings)?;
        tracing::info!(dir = %self.dir().display(), name = %settings.name, "orbit initialized");
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if the orbit has no settings and
    /// `StoreError::Decode` if they are malformed.
    pub fn read_settings(&self) -> Result<Settings, StoreError> {
        let path = self.settings_path();
        read_json(&path)?.ok_or(StoreError::NotInitialized { path })
    }
}

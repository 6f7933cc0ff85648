//! Check log repository.
//!
//! One record per page at `checks/<percent-encoded url>.json`, replaced on
//! every check. Records are swapped in atomically, so concurrent checks of
//! the same page end with one complete log.

use std::path::PathBuf;

use retro_core::CheckLog;
use retro_core::urls::{escape_query, normalize_url};

use crate::error::StoreError;
use crate::records::{read_json, write_json};
use crate::store::OrbitStore;

impl OrbitStore {
    /// Location of the check log for `url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for an invalid URL.
    pub fn check_log_path(&self, url: &str) -> Result<PathBuf, StoreError> {
        let url = normalize_url(url)?;
        Ok(self.checks_dir().join(format!("{}.json", escape_query(&url))))
    }

    /// Latest check log for `url`, `None` if it was never checked.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for an invalid URL, I/O or decode errors.
    pub fn read_check_log(&self, url: &str) -> Result<Option<CheckLog>, StoreError> {
        read_json(&self.check_log_path(url)?)
    }

    /// Replace the check log for `url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for an invalid URL, I/O or encode errors.
    pub fn write_check_log(&self, url: &str, log: &CheckLog) -> Result<(), StoreError> {
        write_json(&self.check_log_path(url)?, log)
    }
}

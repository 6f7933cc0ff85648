use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use retro_check::GeminiFetcher;
use retro_config::RetroConfig;
use retro_db::{FileLocker, OrbitStore, orbit_dir};

use crate::cli::GlobalFlags;

/// Everything a command needs to reach one orbit.
pub struct AppContext {
    pub orbit_id: String,
    pub state_dir: PathBuf,
    pub config: RetroConfig,
    locker: Arc<FileLocker>,
}

impl AppContext {
    pub fn new(orbit_id: &str, config: RetroConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let state_dir = match &flags.state_dir {
            Some(dir) => dir.clone(),
            None => config
                .general
                .resolved_state_dir()
                .context("failed to resolve the state directory")?,
        };
        let locker = Arc::new(FileLocker::from_config(&config.lock));

        Ok(Self {
            orbit_id: orbit_id.to_string(),
            state_dir,
            config,
            locker,
        })
    }

    /// Directory of the orbit, whether or not it has been initialized.
    pub fn orbit_dir(&self) -> anyhow::Result<PathBuf> {
        Ok(orbit_dir(&self.state_dir, &self.orbit_id, false)?)
    }

    /// Store for an orbit that may not exist yet.
    pub fn new_store(&self) -> anyhow::Result<OrbitStore> {
        Ok(OrbitStore::new(self.orbit_dir()?, self.locker.clone()))
    }

    /// Store for an initialized orbit.
    pub fn open_store(&self) -> anyhow::Result<OrbitStore> {
        OrbitStore::open(&self.state_dir, &self.orbit_id, self.locker.clone()).with_context(|| {
            format!(
                "orbit '{}' is not initialized. Run 'retrograde {} init' first.",
                self.orbit_id, self.orbit_id
            )
        })
    }

    pub fn fetcher(&self) -> anyhow::Result<GeminiFetcher> {
        GeminiFetcher::new(&self.config.fetch).context("failed to set up the Gemini client")
    }
}

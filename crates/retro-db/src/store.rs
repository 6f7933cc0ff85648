//! Orbit directory and the store handle built on it.
//!
//! One directory per orbit identifier holds every record of that orbit:
//!
//! ```text
//! <state_dir>/<orbit_id>/
//!     settings.json          written once at init, never locked
//!     members.json           reader/writer lock
//!     submissions.json       exclusive lock
//!     checks/<url>.json      one check log per page
//! ```
//!
//! Repository methods are implemented as `impl OrbitStore` blocks in
//! [`crate::repos`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use retro_core::CoreError;

use crate::error::StoreError;
use crate::lock::{LockGuard, LockMode, Locker};

pub const SETTINGS_FILE: &str = "settings.json";
pub const CHECKS_DIR: &str = "checks";

/// Lock-guarded list records of an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Ordered member ring.
    Members,
    /// Pending submission queue.
    Submissions,
}

impl RecordKind {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Members => "members.json",
            Self::Submissions => "submissions.json",
        }
    }

    /// Lock taken for reading this record.
    ///
    /// The queue is always locked exclusively: a dequeue reads and rewrites
    /// the record in one critical section.
    #[must_use]
    pub const fn read_lock_mode(self) -> LockMode {
        match self {
            Self::Members => LockMode::Shared,
            Self::Submissions => LockMode::Exclusive,
        }
    }
}

/// Resolve the directory of `orbit_id` under `state_dir`.
///
/// With `check_exists`, the orbit must have been initialized.
///
/// # Errors
///
/// Returns `StoreError::Core` for identifiers that are not a single path
/// component and `StoreError::NotInitialized` when `check_exists` is set and
/// the settings record is missing.
pub fn orbit_dir(state_dir: &Path, orbit_id: &str, check_exists: bool) -> Result<PathBuf, StoreError> {
    validate_orbit_id(orbit_id)?;
    let dir = state_dir.join(orbit_id);
    if check_exists {
        let settings_path = dir.join(SETTINGS_FILE);
        if !settings_path.is_file() {
            return Err(StoreError::NotInitialized {
                path: settings_path,
            });
        }
    }
    Ok(dir)
}

fn validate_orbit_id(orbit_id: &str) -> Result<(), CoreError> {
    let ok = !orbit_id.is_empty()
        && orbit_id != "."
        && orbit_id != ".."
        && !orbit_id.contains(['/', '\\', '\0']);
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "orbit identifier '{orbit_id}' must be a single path component"
        )))
    }
}

/// Handle on one orbit's records.
///
/// Holds no cached state: every operation reads the records it needs under
/// the appropriate lock and writes them back before returning.
#[derive(Debug, Clone)]
pub struct OrbitStore {
    dir: PathBuf,
    locker: Arc<dyn Locker>,
}

impl OrbitStore {
    /// Store rooted at `dir`, which may not exist yet.
    pub fn new(dir: impl Into<PathBuf>, locker: Arc<dyn Locker>) -> Self {
        Self {
            dir: dir.into(),
            locker,
        }
    }

    /// Open an initialized orbit.
    ///
    /// # Errors
    ///
    /// See [`orbit_dir`].
    pub fn open(
        state_dir: &Path,
        orbit_id: &str,
        locker: Arc<dyn Locker>,
    ) -> Result<Self, StoreError> {
        Ok(Self::new(orbit_dir(state_dir, orbit_id, true)?, locker))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.settings_path().is_file()
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    #[must_use]
    pub fn record_path(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    #[must_use]
    pub fn checks_dir(&self) -> PathBuf {
        self.dir.join(CHECKS_DIR)
    }

    pub(crate) fn lock(&self, kind: RecordKind, mode: LockMode) -> Result<LockGuard, StoreError> {
        self.locker.acquire(&self.record_path(kind), mode)
    }

    /// Read a list record under its read lock.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O or decode errors.
    pub fn read_list(&self, kind: RecordKind) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock(kind, kind.read_lock_mode())?;
        crate::records::read_list(&self.record_path(kind))
    }

    /// Replace a list record under an exclusive lock. An empty list removes
    /// the backing file.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O or encode errors.
    pub fn write_list(&self, kind: RecordKind, items: &[String]) -> Result<(), StoreError> {
        let _guard = self.lock(kind, LockMode::Exclusive)?;
        crate::records::write_list(&self.record_path(kind), items)
    }

    /// Read-modify-write a list record in one exclusive critical section.
    ///
    /// The record is only rewritten when `f` changed it.
    pub(crate) fn modify_list<R>(
        &self,
        kind: RecordKind,
        f: impl FnOnce(&mut Vec<String>) -> R,
    ) -> Result<R, StoreError> {
        let _guard = self.lock(kind, LockMode::Exclusive)?;
        let path = self.record_path(kind);
        let mut items = crate::records::read_list(&path)?;
        let before = items.clone();
        let result = f(&mut items);
        if items != before {
            crate::records::write_list(&path, &items)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::FileLocker;

    #[test]
    fn orbit_dir_rejects_path_like_ids() {
        let root = Path::new("/tmp/state");
        for bad in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(orbit_dir(root, bad, false), Err(StoreError::Core(_))),
                "'{bad}' should be rejected"
            );
        }
        assert_eq!(
            orbit_dir(root, "demo", false).unwrap(),
            PathBuf::from("/tmp/state/demo")
        );
    }

    #[test]
    fn orbit_dir_requires_settings_when_checked() {
        let temp = tempfile::tempdir().unwrap();
        let err = orbit_dir(temp.path(), "demo", true).unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized { .. }));
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn record_paths_live_in_orbit_dir() {
        let store = OrbitStore::new("/tmp/state/demo", Arc::new(FileLocker::new()));
        assert_eq!(
            store.record_path(RecordKind::Members),
            PathBuf::from("/tmp/state/demo/members.json")
        );
        assert_eq!(
            store.record_path(RecordKind::Submissions),
            PathBuf::from("/tmp/state/demo/submissions.json")
        );
        assert_eq!(store.checks_dir(), PathBuf::from("/tmp/state/demo/checks"));
    }

    #[test]
    fn queue_reads_are_exclusive() {
        assert_eq!(RecordKind::Members.read_lock_mode(), LockMode::Shared);
        assert_eq!(RecordKind::Submissions.read_lock_mode(), LockMode::Exclusive);
    }
}

//! Record locks.
//!
//! Every mutable record is guarded by a sidecar `<record>.lock` file. The
//! [`Locker`] trait is the seam: [`FileLocker`] uses OS advisory locks, which
//! serialize independently launched processes on one host. Locks are released
//! when the returned [`LockGuard`] is dropped, including on error paths.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use retro_config::LockConfig;

use crate::error::StoreError;

/// How a record is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Any number of concurrent holders, excluded by an exclusive holder.
    Shared,
    /// Single holder.
    Exclusive,
}

/// Capability to take scoped shared/exclusive locks on records.
pub trait Locker: Send + Sync + std::fmt::Debug {
    /// Lock `record`, blocking until the lock is granted or the locker's wait
    /// bound is exceeded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockTimeout` when a bounded wait expires and
    /// `StoreError::Io` when the lock file cannot be opened or locked.
    fn acquire(&self, record: &Path, mode: LockMode) -> Result<LockGuard, StoreError>;
}

/// Held lock. Dropping the guard releases it.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    path: PathBuf,
    mode: LockMode,
    _held: Box<dyn Send>,
}

impl LockGuard {
    /// Wrap a lock-specific handle whose `Drop` performs the release.
    pub fn new(path: PathBuf, mode: LockMode, held: impl Send + 'static) -> Self {
        Self {
            path,
            mode,
            _held: Box::new(held),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn mode(&self) -> LockMode {
        self.mode
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Path of the lock file guarding `record`.
#[must_use]
pub fn lock_path_for(record: &Path) -> PathBuf {
    let mut name = record.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Advisory file locks (`flock` on Unix, `LockFileEx` on Windows).
#[derive(Debug, Clone)]
pub struct FileLocker {
    timeout: Option<Duration>,
    retry_delay: Duration,
}

impl Default for FileLocker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLocker {
    /// A locker that waits indefinitely.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            retry_delay: Duration::from_millis(50),
        }
    }

    #[must_use]
    pub fn from_config(config: &LockConfig) -> Self {
        Self {
            timeout: config.timeout(),
            retry_delay: config.retry_delay(),
        }
    }

    /// Bound the wait for a lock. `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    fn lock_bounded(
        &self,
        file: &File,
        lock_path: &Path,
        mode: LockMode,
        timeout: Duration,
    ) -> Result<(), StoreError> {
        let started = Instant::now();
        let contended = fs2::lock_contended_error().raw_os_error();

        loop {
            let attempt = match mode {
                LockMode::Shared => FileExt::try_lock_shared(file),
                LockMode::Exclusive => FileExt::try_lock_exclusive(file),
            };
            match attempt {
                Ok(()) => return Ok(()),
                Err(err) if err.raw_os_error() == contended => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(StoreError::LockTimeout {
                            path: lock_path.to_path_buf(),
                            waited,
                        });
                    }
                    std::thread::sleep(self.retry_delay.min(timeout - waited));
                }
                Err(err) => return Err(StoreError::io(lock_path)(err)),
            }
        }
    }
}

impl Locker for FileLocker {
    fn acquire(&self, record: &Path, mode: LockMode) -> Result<LockGuard, StoreError> {
        let lock_path = lock_path_for(record);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(StoreError::io(&lock_path))?;

        match self.timeout {
            Some(timeout) => self.lock_bounded(&file, &lock_path, mode, timeout)?,
            None => match mode {
                LockMode::Shared => FileExt::lock_shared(&file),
                LockMode::Exclusive => FileExt::lock_exclusive(&file),
            }
            .map_err(StoreError::io(&lock_path))?,
        }

        tracing::debug!(path = %lock_path.display(), ?mode, "lock acquired");
        Ok(LockGuard::new(lock_path, mode, HeldFileLock { file }))
    }
}

struct HeldFileLock {
    file: File,
}

impl Drop for HeldFileLock {
    fn drop(&mut self) {
        // closing the descriptor would release it too
        let _ = FileExt::unlock(&self.file);
    }
}

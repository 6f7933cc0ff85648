//! Lock acquisition settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_retry_delay_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockConfig {
    /// Give up acquiring a record lock after this many seconds.
    /// Unset waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Poll interval while waiting for a lock with a timeout.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LockConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

//! Page fetch settings used by membership checks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_redirects() -> u8 {
    5
}

const fn default_max_response_bytes() -> u64 {
    1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Upper bound for connecting plus reading one response.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Redirects followed before a fetch is given up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u8,

    /// Response bodies are cut off after this many bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

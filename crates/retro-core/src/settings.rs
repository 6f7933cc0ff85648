//! Per-orbit settings.

use serde::{Deserialize, Serialize};

/// Settings written once when an orbit is created and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Display name shown to visitors.
    pub name: String,
    /// Canonical root URL that member pages link back to. The `next`, `prev`
    /// and `random` endpoints live directly below it.
    pub base_url: String,
}

impl Settings {
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

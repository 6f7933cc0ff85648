//! Cross-cutting error types for Retrograde.
//!
//! Storage and fetch errors live in their own crates (`StoreError`,
//! `FetchError`). Everything converges into `anyhow` in `retro-cli`.

use thiserror::Error;

/// Errors that can be raised by any Retrograde crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A URL could not be parsed or is not usable as an orbit page.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Data failed validation (identifiers, settings).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

//! # retro-check
//!
//! Membership verification for Retrograde orbits.
//!
//! A check fetches a candidate page, scans its gemtext link lines for the
//! orbit's navigation links, updates the member ring accordingly and stores
//! a human-readable check log. Fetching goes through the [`Fetcher`] trait;
//! [`GeminiFetcher`] speaks the Gemini protocol. With the `test-support`
//! feature, `MemoryFetcher` serves fixed pages.

pub mod error;
pub mod gemini;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod source;
pub mod verify;

pub use error::FetchError;
pub use gemini::GeminiFetcher;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryFetcher;
pub use source::{Fetcher, LineSource};
pub use verify::{
    CheckOutcome, LinkReport, LinkStatus, check_submissions, check_url, check_url_at,
    compose_message, scan_page,
};

//! # retro-core
//!
//! Core types and pure functions for Retrograde orbits.
//!
//! This crate provides the foundational pieces shared across all Retrograde crates:
//! - Orbit settings and check log records
//! - The four-way membership verdict
//! - URL normalization, capsule prefix extraction and query escaping
//! - Navigation link construction for a candidate page
//! - Deterministic ring ordering and orbit angles
//! - Cross-cutting error types

pub mod check_log;
pub mod errors;
pub mod links;
pub mod ordering;
pub mod settings;
pub mod urls;
pub mod verdict;

pub use check_log::CheckLog;
pub use errors::CoreError;
pub use links::NavigationLinks;
pub use settings::Settings;
pub use verdict::Verdict;

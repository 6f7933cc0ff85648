//! Record repositories.
//!
//! Each module adds methods to `OrbitStore` via `impl OrbitStore` blocks.

pub mod check_logs;
pub mod members;
pub mod settings;
pub mod submissions;

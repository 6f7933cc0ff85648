//! # retro-db
//!
//! Lock-protected on-disk storage for Retrograde orbits.
//!
//! Each orbit is a directory of independent JSON records: settings, the
//! ordered member ring, the pending submission queue and one check log per
//! checked page. Mutations of the ring and the queue are whole-record
//! read-modify-write cycles under an advisory file lock, so concurrent
//! processes on one host never lose an update.

pub mod error;
pub mod lock;
pub mod records;
pub mod repos;
pub mod store;

pub use error::StoreError;
pub use lock::{FileLocker, LockGuard, LockMode, Locker};
pub use store::{OrbitStore, RecordKind, orbit_dir};

//! Member ring repository.
//!
//! Reads take the shared lock, every mutation reads, re-sorts and writes the
//! whole ring under the exclusive lock. URLs are expected to be normalized
//! by the caller.

use retro_core::ordering;

use crate::error::StoreError;
use crate::store::{OrbitStore, RecordKind};

impl OrbitStore {
    /// Current ring in orbit order.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O or decode errors.
    pub fn read_orbit(&self) -> Result<Vec<String>, StoreError> {
        self.read_list(RecordKind::Members)
    }

    /// # Errors
    ///
    /// Same as [`Self::read_orbit`].
    pub fn is_member(&self, url: &str) -> Result<bool, StoreError> {
        Ok(self.read_orbit()?.iter().any(|member| member == url))
    }

    /// Add `url` to the ring. Returns `false` if it was already a member.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O, decode or encode errors.
    pub fn insert_member(&self, url: &str) -> Result<bool, StoreError> {
        self.update_url_membership(url, true).map(|was_member| !was_member)
    }

    /// Remove `url` from the ring. Returns `false` if it was not a member.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O, decode or encode errors.
    pub fn remove_member(&self, url: &str) -> Result<bool, StoreError> {
        self.update_url_membership(url, false)
    }

    /// Set the membership of `url` and return whether it was a member before.
    ///
    /// Reading the previous state and writing the new ring happen in one
    /// exclusive critical section.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O, decode or encode errors.
    pub fn update_url_membership(&self, url: &str, is_member: bool) -> Result<bool, StoreError> {
        let was_member = self.modify_list(RecordKind::Members, |orbit| {
            let was_member = orbit.iter().any(|member| member == url);
            if is_member && !was_member {
                *orbit = ordering::insert(orbit, url);
            } else if !is_member && was_member {
                *orbit = ordering::remove(orbit, url);
            }
            was_member
        })?;

        if was_member != is_member {
            tracing::info!(url, is_member, "orbit membership changed");
        }
        Ok(was_member)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lock::FileLocker;

    fn store() -> (tempfile::TempDir, OrbitStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = OrbitStore::new(temp.path().join("demo"), Arc::new(FileLocker::new()));
        (temp, store)
    }

    #[test]
    fn empty_orbit_reads_empty() {
        let (_temp, store) = store();
        assert!(store.read_orbit().unwrap().is_empty());
        assert!(!store.is_member("gemini://a.example/").unwrap());
    }

    #[test]
    fn insert_keeps_ring_sorted() {
        let (_temp, store) = store();
        let urls = ["gemini://c.example/", "gemini://a.example/", "gemini://b.example/"];
        for url in urls {
            assert!(store.insert_member(url).unwrap());
        }
        let expected = urls
            .iter()
            .fold(Vec::new(), |ring, url| ordering::insert(&ring, url));
        assert_eq!(store.read_orbit().unwrap(), expected);
    }

    #[test]
    fn insert_and_remove_report_previous_state() {
        let (_temp, store) = store();
        assert!(store.insert_member("gemini://a.example/").unwrap());
        assert!(!store.insert_member("gemini://a.example/").unwrap());
        assert!(store.remove_member("gemini://a.example/").unwrap());
        assert!(!store.remove_member("gemini://a.example/").unwrap());
    }

    #[test]
    fn removing_last_member_deletes_record() {
        let (_temp, store) = store();
        store.insert_member("gemini://a.example/").unwrap();
        let path = store.record_path(RecordKind::Members);
        assert!(path.exists());
        store.remove_member("gemini://a.example/").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn update_membership_returns_was_member() {
        let (_temp, store) = store();
        assert!(!store.update_url_membership("gemini://a.example/", true).unwrap());
        assert!(store.update_url_membership("gemini://a.example/", true).unwrap());
        assert!(store.update_url_membership("gemini://a.example/", false).unwrap());
        assert!(!store.update_url_membership("gemini://a.example/", false).unwrap());
        assert!(store.read_orbit().unwrap().is_empty());
    }
}

//! Submission queue repository.
//!
//! FIFO, deduplicated by normalized URL. Every access takes the queue's
//! exclusive lock so enqueue and dequeue are totally ordered.

use retro_core::urls::normalize_url;

use crate::error::StoreError;
use crate::store::{OrbitStore, RecordKind};

impl OrbitStore {
    /// Queue `url` for a membership check.
    ///
    /// Returns `false` if an equivalent URL is already queued.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for an invalid URL, otherwise lock, I/O,
    /// decode or encode errors.
    pub fn append_submission(&self, url: &str) -> Result<bool, StoreError> {
        let url = normalize_url(url)?;
        let queued = self.modify_list(RecordKind::Submissions, |queue| {
            if queue.contains(&url) {
                false
            } else {
                queue.push(url.clone());
                true
            }
        })?;

        if queued {
            tracing::info!(url = %url, "submission queued");
        } else {
            tracing::debug!(url = %url, "submission already queued");
        }
        Ok(queued)
    }

    /// Remove and return the earliest queued URL, `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O, decode or encode errors.
    pub fn pop_submission(&self) -> Result<Option<String>, StoreError> {
        self.modify_list(RecordKind::Submissions, |queue| {
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        })
    }

    /// Pending submissions in queue order.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O or decode errors.
    pub fn read_submissions(&self) -> Result<Vec<String>, StoreError> {
        self.read_list(RecordKind::Submissions)
    }
}

//! Audit record of the most recent membership check for one page.

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckLog {
    /// Unix timestamp (seconds) of the check.
    pub timestamp: i64,
    /// Result of this check.
    pub is_valid: bool,
    /// Membership immediately before this check.
    pub was_valid: bool,
    /// Human-readable report of found and missing links.
    pub message: String,
}

impl CheckLog {
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        Verdict::from_transition(self.was_valid, self.is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_follows_flags() {
        let log = CheckLog {
            timestamp: 0,
            is_valid: false,
            was_valid: true,
            message: String::new(),
        };
        assert_eq!(log.verdict(), Verdict::Removed);
    }
}

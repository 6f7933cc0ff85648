//! Membership verdicts.
//!
//! A check moves a page between "in orbit" and "out of orbit". The pair
//! `(was_valid, is_valid)` maps onto exactly one of four outcomes:
//!
//! ```text
//! was \ is   false                 true
//! false      Remains out of orbit  Added to orbit
//! true       Removed from orbit    Remains in orbit
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    RemainsOut,
    Added,
    Removed,
    RemainsIn,
}

impl Verdict {
    /// All verdicts, in table order.
    pub const ALL: [Self; 4] = [Self::RemainsOut, Self::Added, Self::Removed, Self::RemainsIn];

    #[must_use]
    pub const fn from_transition(was_valid: bool, is_valid: bool) -> Self {
        match (was_valid, is_valid) {
            (false, false) => Self::RemainsOut,
            (false, true) => Self::Added,
            (true, false) => Self::Removed,
            (true, true) => Self::RemainsIn,
        }
    }

    #[must_use]
    pub const fn was_valid(self) -> bool {
        matches!(self, Self::Removed | Self::RemainsIn)
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Added | Self::RemainsIn)
    }

    /// Whether the check changed the page's membership.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }

    /// Label used in check log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RemainsOut => "Remains out of orbit",
            Self::Added => "Added to orbit",
            Self::Removed => "Removed from orbit",
            Self::RemainsIn => "Remains in orbit",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, false, Verdict::RemainsOut, "Remains out of orbit")]
    #[case(false, true, Verdict::Added, "Added to orbit")]
    #[case(true, false, Verdict::Removed, "Removed from orbit")]
    #[case(true, true, Verdict::RemainsIn, "Remains in orbit")]
    fn transition_table(
        #[case] was_valid: bool,
        #[case] is_valid: bool,
        #[case] expected: Verdict,
        #[case] label: &str,
    ) {
        let verdict = Verdict::from_transition(was_valid, is_valid);
        assert_eq!(verdict, expected);
        assert_eq!(verdict.label(), label);
        assert_eq!(verdict.to_string(), label);
        assert_eq!(verdict.was_valid(), was_valid);
        assert_eq!(verdict.is_valid(), is_valid);
    }

    #[test]
    fn table_is_exhaustive_and_distinct() {
        let mut seen = Vec::new();
        for was_valid in [false, true] {
            for is_valid in [false, true] {
                let verdict = Verdict::from_transition(was_valid, is_valid);
                assert!(!seen.contains(&verdict));
                seen.push(verdict);
            }
        }
        assert_eq!(seen, Verdict::ALL);
    }

    #[test]
    fn only_membership_flips_are_changes() {
        assert!(Verdict::Added.is_change());
        assert!(Verdict::Removed.is_change());
        assert!(!Verdict::RemainsIn.is_change());
        assert!(!Verdict::RemainsOut.is_change());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::RemainsOut).expect("verdict should serialize");
        assert_eq!(json, "\"remains_out\"");
    }
}

//! Navigation links a member page exposes.

use crate::urls::escape_query;

/// The navigation links expected on one candidate page.
///
/// Links are built by plain string concatenation onto the orbit's base URL,
/// so they only match links written in exactly this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLinks {
    pub about: String,
    pub next: String,
    pub prev: String,
    pub random: String,
}

impl NavigationLinks {
    /// Build the links for `page_url` (expected to be normalized already).
    #[must_use]
    pub fn for_page(base_url: &str, page_url: &str) -> Self {
        let escaped = escape_query(page_url);
        Self {
            about: base_url.to_string(),
            next: format!("{base_url}next?{escaped}"),
            prev: format!("{base_url}prev?{escaped}"),
            random: format!("{base_url}random?{escaped}"),
        }
    }

    /// Links that must all be present for membership.
    #[must_use]
    pub fn required(&self) -> [&str; 3] {
        [&self.about, &self.next, &self.prev]
    }

    /// Links that are reported on but not needed for membership.
    #[must_use]
    pub fn optional(&self) -> [&str; 1] {
        [&self.random]
    }
}

//! # retro-api
//!
//! Visitor-facing operations of a Retrograde orbit.
//!
//! Navigation (`next`, `prev`, `random`) works for any page URL: a page that
//! is not yet a member is queued for a membership check and slotted into a
//! copy of the ring, so its links work before it has been verified. The
//! persisted ring is only ever changed by membership checks.

pub mod navigation;
pub mod pages;

pub use navigation::{list_urls, next_url, prev_url, random_url, random_url_with, submit_url};
pub use pages::{render_dashboard, render_list_page};

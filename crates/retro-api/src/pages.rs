//! Gemtext pages served to visitors.

use std::fmt::Write as _;

use retro_core::ordering::angle;
use retro_core::urls::{escape_query, normalize_url};
use retro_core::{CheckLog, NavigationLinks};
use retro_db::{OrbitStore, StoreError};

const POWERED_BY_URL: &str = "gemini://raek.se/projects/retrograde/";

fn has_gemini_scheme(url: &str) -> bool {
    url.get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("gemini://"))
}

/// Per-page dashboard: membership status, latest check log and the links a
/// page needs to join.
///
/// Anything not starting with `gemini://` is taken to be a scheme-less
/// Gemini URL and prefixed accordingly.
///
/// # Errors
///
/// Returns `StoreError::Core` for an invalid URL and storage errors.
pub fn render_dashboard(store: &OrbitStore, url: &str) -> Result<String, StoreError> {
    let url = if has_gemini_scheme(url) {
        normalize_url(url)?
    } else {
        normalize_url(&format!("gemini://{url}"))?
    };
    let settings = store.read_settings()?;
    let is_member = store.is_member(&url)?;
    let check_log = store.read_check_log(&url)?;

    let base = &settings.base_url;
    let name = &settings.name;
    let escaped = escape_query(&url);
    let links = NavigationLinks::for_page(base, &url);
    let status = if is_member { "IN ORBIT" } else { "NOT IN ORBIT" };
    let log_message = check_log.as_ref().map_or(
        "No membership check log found. Submit page for membership check!",
        |log: &CheckLog| log.message.as_str(),
    );

    let mut page = String::new();
    let _ = writeln!(page, "# {name} - Page Dashboard");
    let _ = writeln!(page, "Status: {status}");
    page.push('\n');
    let _ = writeln!(page, "=> {url} Visit {url}");
    let _ = writeln!(page, "=> {base}dashboard?{escaped} Reload this dashboard");
    let _ = writeln!(page, "=> {base}submit?{escaped} Submit page for a membership check");
    let _ = writeln!(page, "=> {base} Back to orbit main page");
    page.push('\n');
    page.push_str("```Membership Check Log\n");
    page.push_str(log_message.trim_end_matches('\n'));
    page.push_str("\n```\n\n");

    page.push_str("## How to join\n\n");
    let _ = writeln!(
        page,
        "For a page to be part of {name}, it needs to be a gemtext page that contains \
         navigation links (next, previous, about). Here are the links made for your URL:"
    );
    page.push_str("\n```\nRequired:\n");
    let _ = writeln!(page, "=> {} About {name}", links.about);
    let _ = writeln!(page, "=> {} Next Page", links.next);
    let _ = writeln!(page, "=> {} Previous Page", links.prev);
    page.push_str("\nOptional:\n");
    let _ = writeln!(page, "=> {} Random Page", links.random);
    page.push_str("```\n\n");
    page.push_str(
        "The link text (\"Next Page\" etc) does not have to be like in the example above, \
         but can be anything.\n\n",
    );
    page.push_str(
        "After you have added the links to the page, visit the \
         \"Submit page for membership check\" link above.\n\n",
    );

    page.push_str("## How to leave\n\n");
    page.push_str(
        "Remove the navigation links from the page and visit the \
         \"Submit page for membership check\" link above.\n\n",
    );

    page.push_str("## Retrograde\n\n");
    let _ = writeln!(page, "=> {POWERED_BY_URL} This orbit is powered by Retrograde.");

    Ok(page)
}

/// Gemtext list of all members with their position on the orbit.
///
/// # Errors
///
/// Returns storage errors.
pub fn render_list_page(store: &OrbitStore) -> Result<String, StoreError> {
    let settings = store.read_settings()?;
    let mut page = format!("# {}\n\n", settings.name);
    for url in store.read_orbit()? {
        let _ = writeln!(page, "=> {url} {:3}° – {url}", angle(&url));
    }
    Ok(page)
}

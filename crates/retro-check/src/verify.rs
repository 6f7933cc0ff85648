//! Membership verification.
//!
//! A page is in orbit when it links to the orbit's base URL and to the
//! `next` and `prev` endpoints for its own URL. The `random` link is
//! reported but not required. Links are compared as exact strings; relative
//! links on the page are not resolved and never match.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use retro_core::urls::normalize_url;
use retro_core::{CheckLog, NavigationLinks, Verdict};
use retro_db::{OrbitStore, StoreError};

use crate::source::{Fetcher, LineSource};

/// Gemtext link line: `=>`, at most one whitespace character, then the target.
static LINK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=>\s?(\S+)").expect("link line pattern is valid"));

/// Link target of a gemtext link line.
#[must_use]
pub fn extract_link(line: &str) -> Option<&str> {
    LINK_LINE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|target| target.as_str())
}

/// Whether one expected link was seen on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub link: String,
    pub found: bool,
}

/// What a page scan found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Required links, sorted by link text.
    pub required: Vec<LinkStatus>,
    /// Optional links, sorted by link text.
    pub optional: Vec<LinkStatus>,
    /// Every other link target on the page, in page order.
    pub other_links: Vec<String>,
    /// Why the fetch stopped early, if it did.
    pub fetch_error: Option<String>,
}

impl LinkReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.required.iter().all(|status| status.found)
    }

    pub fn missing_required(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .filter(|status| !status.found)
            .map(|status| status.link.as_str())
    }
}

struct LinkScanner {
    required: BTreeSet<String>,
    optional: BTreeSet<String>,
    remaining_required: BTreeSet<String>,
    remaining_optional: BTreeSet<String>,
    found_links: Vec<String>,
}

impl LinkScanner {
    fn new(links: &NavigationLinks) -> Self {
        let required = links
            .required()
            .iter()
            .map(|link| (*link).to_string())
            .collect::<BTreeSet<_>>();
        let optional = links
            .optional()
            .iter()
            .map(|link| (*link).to_string())
            .collect::<BTreeSet<_>>();
        Self {
            remaining_required: required.clone(),
            remaining_optional: optional.clone(),
            required,
            optional,
            found_links: Vec::new(),
        }
    }

    fn observe(&mut self, line: &str) {
        let Some(link) = extract_link(line) else {
            return;
        };
        self.remaining_required.remove(link);
        self.remaining_optional.remove(link);
        self.found_links.push(link.to_string());
    }

    fn finish(self, fetch_error: Option<String>) -> LinkReport {
        let status = |links: &BTreeSet<String>, remaining: &BTreeSet<String>| {
            links
                .iter()
                .map(|link| LinkStatus {
                    link: link.clone(),
                    found: !remaining.contains(link),
                })
                .collect::<Vec<_>>()
        };
        let other_links = self
            .found_links
            .iter()
            .filter(|link| !self.required.contains(*link) && !self.optional.contains(*link))
            .cloned()
            .collect();

        LinkReport {
            required: status(&self.required, &self.remaining_required),
            optional: status(&self.optional, &self.remaining_optional),
            other_links,
            fetch_error,
        }
    }
}

/// Fetch `url` and look for `links` on it.
///
/// Never fails: a fetch error ends the scan and is carried in the report,
/// links not seen before it count as missing. Undecodable bytes are replaced
/// rather than aborting the scan. The line source is always discarded.
pub async fn scan_page<F: Fetcher>(fetcher: &F, url: &str, links: &NavigationLinks) -> LinkReport {
    let mut scanner = LinkScanner::new(links);

    let fetch_error = match fetcher.request(url).await {
        Ok(mut source) => {
            let outcome = loop {
                match source.next_line().await {
                    Ok(Some(line)) => scanner.observe(&String::from_utf8_lossy(&line)),
                    Ok(None) => break None,
                    Err(error) => break Some(error),
                }
            };
            source.discard().await;
            outcome
        }
        Err(error) => Some(error),
    };

    let fetch_error = fetch_error.map(|error| {
        tracing::warn!(url, %error, "page fetch failed");
        error.to_string()
    });
    scanner.finish(fetch_error)
}

/// Result of checking one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Normalized page URL.
    pub url: String,
    pub verdict: Verdict,
    pub report: LinkReport,
    /// The log persisted for this check.
    pub log: CheckLog,
}

impl CheckOutcome {
    #[must_use]
    pub const fn was_valid(&self) -> bool {
        self.log.was_valid
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.log.is_valid
    }
}

/// Check `url` against the orbit, update its membership and store the log.
///
/// # Errors
///
/// Fetch problems are never errors. Fails only for an invalid URL, a missing
/// or malformed orbit, or storage failures.
pub async fn check_url<F: Fetcher>(
    store: &OrbitStore,
    fetcher: &F,
    url: &str,
) -> Result<CheckOutcome, StoreError> {
    check_url_at(store, fetcher, url, Utc::now()).await
}

/// [`check_url`] with an explicit check time.
///
/// # Errors
///
/// Same as [`check_url`].
pub async fn check_url_at<F: Fetcher>(
    store: &OrbitStore,
    fetcher: &F,
    url: &str,
    now: DateTime<Utc>,
) -> Result<CheckOutcome, StoreError> {
    let url = normalize_url(url)?;
    let settings = blocking(store, OrbitStore::read_settings).await?;
    let links = NavigationLinks::for_page(&settings.base_url, &url);

    let report = scan_page(fetcher, &url, &links).await;
    let is_valid = report.is_valid();
    let was_valid = {
        let url = url.clone();
        blocking(store, move |store| store.update_url_membership(&url, is_valid)).await?
    };
    let verdict = Verdict::from_transition(was_valid, is_valid);

    let log = CheckLog {
        timestamp: now.timestamp(),
        is_valid,
        was_valid,
        message: compose_message(now, verdict, &report),
    };
    {
        let (url, log) = (url.clone(), log.clone());
        blocking(store, move |store| store.write_check_log(&url, &log)).await?;
    }
    tracing::info!(url = %url, %verdict, "membership checked");

    Ok(CheckOutcome {
        url,
        verdict,
        report,
        log,
    })
}

/// Check queued submissions one at a time until the queue is empty.
///
/// Each URL is removed from the queue before it is checked, so a URL is
/// checked at most once per submission even with several consumers.
/// `on_outcome` runs after every check.
///
/// # Errors
///
/// Stops at the first storage error; URLs still queued stay queued.
pub async fn check_submissions<F: Fetcher>(
    store: &OrbitStore,
    fetcher: &F,
    mut on_outcome: impl FnMut(&CheckOutcome),
) -> Result<Vec<CheckOutcome>, StoreError> {
    let mut outcomes = Vec::new();
    while let Some(url) = blocking(store, OrbitStore::pop_submission).await? {
        tracing::debug!(url = %url, "checking submission");
        let outcome = check_url(store, fetcher, &url).await?;
        on_outcome(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Run a store call on the blocking pool. Record locks and file I/O block
/// the calling thread.
async fn blocking<T, F>(store: &OrbitStore, call: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&OrbitStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|e| StoreError::TaskFailed(format!("spawn_blocking join: {e}")))?
}

/// Human-readable check log message.
#[must_use]
pub fn compose_message(now: DateTime<Utc>, verdict: Verdict, report: &LinkReport) -> String {
    let mut message = String::new();
    let _ = writeln!(message, "Timestamp: {}", format_timestamp(now));
    let _ = writeln!(message, "Result: {verdict}");
    message.push('\n');

    if let Some(error) = &report.fetch_error {
        message.push_str("Fetch error:\n");
        let _ = writeln!(message, "* {error}");
        message.push('\n');
    }

    message.push_str("Required navigation links:\n");
    write_statuses(&mut message, &report.required);
    message.push('\n');

    message.push_str("Optional navigation links:\n");
    write_statuses(&mut message, &report.optional);
    message.push('\n');

    if !report.is_valid() {
        message.push_str("Other links found on page:\n");
        for link in &report.other_links {
            let _ = writeln!(message, "* {link}");
        }
        message.push('\n');
    }

    message
}

/// `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`; microseconds only when non-zero.
fn format_timestamp(now: DateTime<Utc>) -> String {
    if now.timestamp_subsec_micros() == 0 {
        now.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        now.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}

fn write_statuses(message: &mut String, statuses: &[LinkStatus]) {
    for status in statuses {
        let tag = if status.found { "[FOUND]  " } else { "[MISSING]" };
        let _ = writeln!(message, "* {tag} {}", status.link);
    }
}

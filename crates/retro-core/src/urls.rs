//! URL handling: normalization, capsule prefixes and query escaping.
//!
//! Gemini is a non-special scheme for the WHATWG parser, so hosts are not
//! lowercased and empty paths are kept as-is by `url`. Normalization fills
//! those gaps so that textual variants of one page collapse to one string.

use std::fmt::Write as _;

use url::Url;

use crate::errors::CoreError;

/// Default port of the Gemini protocol.
pub const GEMINI_DEFAULT_PORT: u16 = 1965;

/// Canonicalize a page URL.
///
/// - scheme and host are lowercased
/// - the Gemini default port is dropped
/// - an empty path becomes `/`, dot segments are resolved
/// - fragments and empty queries are removed
///
/// Normalizing an already normalized URL returns it unchanged.
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` if the input does not parse or has no host.
pub fn normalize_url(raw: &str) -> Result<String, CoreError> {
    let mut url = parse_with_host(raw)?;

    if let Some(host) = url.host_str() {
        let lowered = host.to_ascii_lowercase();
        if lowered != host {
            url.set_host(Some(&lowered))
                .map_err(|e| CoreError::invalid_url(raw, e.to_string()))?;
        }
    }

    if url.scheme() == "gemini" && url.port() == Some(GEMINI_DEFAULT_PORT) {
        url.set_port(None)
            .map_err(|()| CoreError::invalid_url(raw, "cannot clear port"))?;
    }

    if url.path().is_empty() {
        url.set_path("/");
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    url.set_fragment(None);

    Ok(String::from(url))
}

/// Identify the capsule (hosting site) a URL belongs to.
///
/// The prefix is `scheme://host[:port]/`, extended with the first path
/// segment when it is a `~user` home directory, so that pages of different
/// users on a shared host are told apart.
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` if the input does not parse or has no host.
pub fn capsule_prefix(url: &str) -> Result<String, CoreError> {
    let parsed = parse_with_host(url)?;
    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

    let mut prefix = format!("{}://{host}", parsed.scheme());
    if let Some(port) = parsed.port()
        && !(parsed.scheme() == "gemini" && port == GEMINI_DEFAULT_PORT)
    {
        let _ = write!(prefix, ":{port}");
    }
    prefix.push('/');

    if let Some(first) = parsed.path_segments().and_then(|mut segments| segments.next())
        && first.starts_with('~')
    {
        prefix.push_str(first);
        prefix.push('/');
    }

    Ok(prefix)
}

/// Percent-encode a string for embedding in a query string.
///
/// Every byte outside the unreserved set (`A-Z a-z 0-9 - _ . ~`) is encoded,
/// including `/`, `:` and `?`.
#[must_use]
pub fn escape_query(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn parse_with_host(raw: &str) -> Result<Url, CoreError> {
    let url = Url::parse(raw.trim()).map_err(|e| CoreError::invalid_url(raw, e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::invalid_url(raw, "URL has no host"));
    }
    Ok(url)
}

//! Fetch error types.

use thiserror::Error;

/// Errors raised while fetching a candidate page.
///
/// Membership checks never propagate these: they are recorded in the check
/// log and the links not seen so far count as missing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("invalid server name: {0}")]
    ServerName(#[from] rustls::pki_types::InvalidDnsNameError),

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out")]
    Timeout,

    #[error("malformed response header {0:?}")]
    MalformedHeader(String),

    /// The server answered with a non-success, non-redirect status.
    #[error("server responded with status {status}: {meta}")]
    Status { status: u8, meta: String },

    #[error("gave up after {0} redirects")]
    TooManyRedirects(u8),

    #[error("response body exceeds {0} bytes")]
    TooLarge(u64),

    /// Failure reported by a non-network fetcher.
    #[error("{0}")]
    Other(String),
}

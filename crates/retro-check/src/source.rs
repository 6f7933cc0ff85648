//! Fetch collaborator interface.
//!
//! A [`Fetcher`] turns a URL into a [`LineSource`] streaming the response
//! body. Whoever obtains a source must call [`LineSource::discard`] on it
//! once done, whether reading succeeded or not.

use std::future::Future;

use crate::error::FetchError;

/// Response body read line by line.
pub trait LineSource: Send {
    /// Next raw line including its terminator, `None` at the end of the body.
    ///
    /// Lines are bytes; decoding is up to the caller.
    fn next_line(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, FetchError>> + Send;

    /// Release the underlying connection.
    fn discard(self) -> impl Future<Output = ()> + Send;
}

/// Protocol client used by membership checks.
pub trait Fetcher: Send + Sync {
    type Source: LineSource;

    /// Request `url` and return its body as a line source.
    fn request(&self, url: &str) -> impl Future<Output = Result<Self::Source, FetchError>> + Send;
}

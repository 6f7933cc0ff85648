//! In-memory fetcher serving fixed pages.
//!
//! Useful for checking pages without network access and for exercising
//! the verification pipeline, including failures in the middle of a body.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::FetchError;
use crate::source::{Fetcher, LineSource};

#[derive(Debug, Clone)]
enum Page {
    Body {
        lines: Vec<Vec<u8>>,
        failure: Option<String>,
    },
    Unreachable(String),
}

/// Fetcher backed by a map from URL to page body.
///
/// Unknown URLs fail like a Gemini `51 Not found` response.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, Page>,
    discarded: Arc<AtomicUsize>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_raw_lines(url, split_lines(body))
    }

    /// Serve raw (possibly non UTF-8) lines for `url`.
    #[must_use]
    pub fn with_raw_lines(mut self, url: &str, lines: Vec<Vec<u8>>) -> Self {
        self.pages.insert(
            url.to_string(),
            Page::Body {
                lines,
                failure: None,
            },
        );
        self
    }

    /// Serve `body` for `url`, then fail with `error` instead of ending.
    #[must_use]
    pub fn with_broken_page(mut self, url: &str, body: &str, error: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Page::Body {
                lines: split_lines(body),
                failure: Some(error.to_string()),
            },
        );
        self
    }

    /// Fail every request for `url` with `error`.
    #[must_use]
    pub fn with_unreachable(mut self, url: &str, error: &str) -> Self {
        self.pages
            .insert(url.to_string(), Page::Unreachable(error.to_string()));
        self
    }

    /// Number of sources handed out and discarded so far.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }
}

fn split_lines(body: &str) -> Vec<Vec<u8>> {
    body.split_inclusive('\n')
        .map(|line| line.as_bytes().to_vec())
        .collect()
}

impl Fetcher for MemoryFetcher {
    type Source = MemorySource;

    async fn request(&self, url: &str) -> Result<MemorySource, FetchError> {
        match self.pages.get(url) {
            Some(Page::Body { lines, failure }) => Ok(MemorySource {
                lines: lines.iter().cloned().collect(),
                failure: failure.clone(),
                discarded: Arc::clone(&self.discarded),
            }),
            Some(Page::Unreachable(error)) => Err(FetchError::Other(error.clone())),
            None => Err(FetchError::Status {
                status: 51,
                meta: String::from("Not found"),
            }),
        }
    }
}

#[derive(Debug)]
pub struct MemorySource {
    lines: VecDeque<Vec<u8>>,
    failure: Option<String>,
    discarded: Arc<AtomicUsize>,
}

impl LineSource for MemorySource {
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        if let Some(line) = self.lines.pop_front() {
            return Ok(Some(line));
        }
        match self.failure.take() {
            Some(error) => Err(FetchError::Other(error)),
            None => Ok(None),
        }
    }

    async fn discard(self) {
        self.discarded.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_lines_then_ends() {
        let fetcher = MemoryFetcher::new().with_page("gemini://a.example/", "one\ntwo");
        let mut source = fetcher.request("gemini://a.example/").await.unwrap();
        assert_eq!(source.next_line().await.unwrap(), Some(b"one\n".to_vec()));
        assert_eq!(source.next_line().await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(source.next_line().await.unwrap(), None);
        source.discard().await;
        assert_eq!(fetcher.discarded(), 1);
    }

    #[tokio::test]
    async fn broken_page_fails_after_body() {
        let fetcher =
            MemoryFetcher::new().with_broken_page("gemini://a.example/", "one\n", "reset");
        let mut source = fetcher.request("gemini://a.example/").await.unwrap();
        assert!(source.next_line().await.unwrap().is_some());
        assert!(source.next_line().await.is_err());
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let fetcher = MemoryFetcher::new();
        assert!(matches!(
            fetcher.request("gemini://a.example/").await,
            Err(FetchError::Status { status: 51, .. })
        ));
    }
}

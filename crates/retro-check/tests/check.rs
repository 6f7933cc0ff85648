//! End-to-end membership checks against an on-disk orbit.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use retro_check::{MemoryFetcher, check_submissions, check_url, check_url_at};
use retro_core::{NavigationLinks, Settings, Verdict};
use retro_db::{FileLocker, LockMode, Locker, OrbitStore, RecordKind, StoreError};

const BASE: &str = "gemini://orbit.example/demo/";

fn orbit() -> (TempDir, OrbitStore) {
    let temp = TempDir::new().unwrap();
    let store = OrbitStore::new(temp.path().join("demo"), Arc::new(FileLocker::new()));
    store.init_settings(&Settings::new("Demo", BASE)).unwrap();
    (temp, store)
}

fn member_page(url: &str) -> String {
    let links = NavigationLinks::for_page(BASE, url);
    format!(
        "# My page\n\n=> {} Demo orbit\n=> {} Next\n=> {} Previous\n=> {} Random\n",
        links.about, links.next, links.prev, links.random
    )
}

#[tokio::test]
async fn valid_page_is_added_then_remains() {
    let (_temp, store) = orbit();
    let url = "gemini://page.example/";
    let fetcher = MemoryFetcher::new().with_page(url, &member_page(url));

    let first = check_url(&store, &fetcher, url).await.unwrap();
    assert_eq!(first.verdict, Verdict::Added);
    assert_eq!(store.read_orbit().unwrap(), vec![url.to_string()]);

    let second = check_url(&store, &fetcher, url).await.unwrap();
    assert_eq!(second.verdict, Verdict::RemainsIn);
    assert!(second.was_valid() && second.is_valid());
    assert_eq!(fetcher.discarded(), 2);
}

#[tokio::test]
async fn page_dropping_links_is_removed() {
    let (_temp, store) = orbit();
    let url = "gemini://page.example/";
    store.insert_member(url).unwrap();

    let fetcher = MemoryFetcher::new().with_page(url, "# Nothing here\n=> gemini://other.example/\n");
    let outcome = check_url(&store, &fetcher, url).await.unwrap();

    assert_eq!(outcome.verdict, Verdict::Removed);
    assert!(store.read_orbit().unwrap().is_empty());
    assert!(outcome.log.message.contains("Result: Removed from orbit"));
    assert!(outcome.log.message.contains("Other links found on page:\n* gemini://other.example/\n"));
}

#[tokio::test]
async fn unreachable_page_still_gets_a_verdict_and_log() {
    let (_temp, store) = orbit();
    let url = "gemini://down.example/";
    let fetcher = MemoryFetcher::new().with_unreachable(url, "connection refused");

    let outcome = check_url(&store, &fetcher, url).await.unwrap();
    assert_eq!(outcome.verdict, Verdict::RemainsOut);
    assert_eq!(outcome.report.missing_required().count(), 3);

    let log = store.read_check_log(url).unwrap().expect("log should be written");
    assert_eq!(log, outcome.log);
    assert!(log.message.contains("Fetch error:\n* connection refused\n"));
}

#[tokio::test]
async fn url_is_normalized_before_checking() {
    let (_temp, store) = orbit();
    let url = "gemini://page.example/";
    let fetcher = MemoryFetcher::new().with_page(url, &member_page(url));

    let outcome = check_url(&store, &fetcher, "gemini://PAGE.example:1965").await.unwrap();
    assert_eq!(outcome.url, url);
    assert_eq!(outcome.verdict, Verdict::Added);
}

#[tokio::test]
async fn log_carries_check_time() {
    let (_temp, store) = orbit();
    let url = "gemini://page.example/";
    let fetcher = MemoryFetcher::new().with_page(url, &member_page(url));
    let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();

    let outcome = check_url_at(&store, &fetcher, url, now).await.unwrap();
    assert_eq!(outcome.log.timestamp, 1_700_000_000);
    assert!(
        outcome
            .log
            .message
            .starts_with("Timestamp: 2023-11-14 22:13:20+00:00\nResult: Added to orbit\n")
    );
}

#[tokio::test]
async fn uninitialized_orbit_is_an_error() {
    let temp = TempDir::new().unwrap();
    let store = OrbitStore::new(temp.path().join("missing"), Arc::new(FileLocker::new()));
    let fetcher = MemoryFetcher::new();

    let result = check_url(&store, &fetcher, "gemini://page.example/").await;
    assert!(matches!(result, Err(StoreError::NotInitialized { .. })));
}

#[tokio::test]
async fn submissions_are_drained_in_order() {
    let (_temp, store) = orbit();
    let good = "gemini://good.example/";
    let bad = "gemini://bad.example/";
    store.append_submission(good).unwrap();
    store.append_submission(bad).unwrap();
    store.append_submission(good).unwrap();

    let fetcher = MemoryFetcher::new()
        .with_page(good, &member_page(good))
        .with_page(bad, "no links\n");

    let mut seen = Vec::new();
    let outcomes = check_submissions(&store, &fetcher, |outcome| seen.push(outcome.url.clone()))
        .await
        .unwrap();

    assert_eq!(seen, vec![good.to_string(), bad.to_string()]);
    assert_eq!(
        outcomes.iter().map(|o| o.verdict).collect::<Vec<_>>(),
        vec![Verdict::Added, Verdict::RemainsOut]
    );
    assert!(store.read_submissions().unwrap().is_empty());
    assert_eq!(store.read_orbit().unwrap(), vec![good.to_string()]);
}

#[tokio::test]
async fn concurrent_checks_of_different_pages_keep_both() {
    let (_temp, store) = orbit();
    let a = "gemini://a.example/";
    let b = "gemini://b.example/";
    let fetcher = MemoryFetcher::new()
        .with_page(a, &member_page(a))
        .with_page(b, &member_page(b));

    let (ra, rb) = tokio::join!(check_url(&store, &fetcher, a), check_url(&store, &fetcher, b));
    assert_eq!(ra.unwrap().verdict, Verdict::Added);
    assert_eq!(rb.unwrap().verdict, Verdict::Added);
    assert_eq!(store.read_orbit().unwrap().len(), 2);
}

#[tokio::test]
async fn check_waits_for_a_held_ring_lock_without_stalling_the_runtime() {
    let (_temp, store) = orbit();
    let url = "gemini://page.example/";
    let fetcher = MemoryFetcher::new().with_page(url, &member_page(url));

    let held = FileLocker::new()
        .acquire(&store.record_path(RecordKind::Members), LockMode::Exclusive)
        .unwrap();
    let release = async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        drop(held);
    };

    let (outcome, ()) = tokio::join!(check_url(&store, &fetcher, url), release);
    assert_eq!(outcome.unwrap().verdict, Verdict::Added);
    assert_eq!(store.read_orbit().unwrap(), vec![url.to_string()]);
}

//! Ring navigation.

use rand::Rng;
use rand::seq::SliceRandom;
use retro_core::ordering;
use retro_core::urls::normalize_url;
use retro_db::{OrbitStore, StoreError};

#[derive(Debug, Clone, Copy)]
enum Step {
    Forward,
    Backward,
}

/// Member after `url` in orbit order, wrapping around.
///
/// # Errors
///
/// Returns `StoreError::Core` for an invalid URL and storage errors.
pub fn next_url(store: &OrbitStore, url: &str) -> Result<String, StoreError> {
    neighbor(store, url, Step::Forward)
}

/// Member before `url` in orbit order, wrapping around.
///
/// # Errors
///
/// Returns `StoreError::Core` for an invalid URL and storage errors.
pub fn prev_url(store: &OrbitStore, url: &str) -> Result<String, StoreError> {
    neighbor(store, url, Step::Backward)
}

fn neighbor(store: &OrbitStore, url: &str, step: Step) -> Result<String, StoreError> {
    let url = normalize_url(url)?;
    let mut orbit = store.read_orbit()?;
    if !orbit.contains(&url) {
        enroll(store, &url)?;
        orbit = ordering::insert(&orbit, &url);
    }

    // present after the provisional insert
    let index = orbit
        .iter()
        .position(|member| *member == url)
        .unwrap_or_default();
    let len = orbit.len();
    let target = match step {
        Step::Forward => (index + 1) % len,
        Step::Backward => (index + len - 1) % len,
    };
    Ok(orbit.swap_remove(target))
}

/// Random member, using the thread-local RNG.
///
/// # Errors
///
/// See [`random_url_with`].
pub fn random_url(store: &OrbitStore, reference: Option<&str>) -> Result<Option<String>, StoreError> {
    random_url_with(store, reference, &mut rand::thread_rng())
}

/// Random member other than `reference`, `None` if there is none.
///
/// A member `reference` is only left out of this draw; the stored ring is
/// not changed. A non-member `reference` is queued for checking.
///
/// # Errors
///
/// Returns `StoreError::Core` for an invalid reference URL and storage errors.
pub fn random_url_with<R: Rng + ?Sized>(
    store: &OrbitStore,
    reference: Option<&str>,
    rng: &mut R,
) -> Result<Option<String>, StoreError> {
    let orbit = store.read_orbit()?;
    let reference = reference.map(normalize_url).transpose()?;

    if let Some(url) = &reference
        && !orbit.contains(url)
    {
        enroll(store, url)?;
    }

    let pool = orbit
        .iter()
        .filter(|member| reference.as_ref() != Some(*member))
        .collect::<Vec<_>>();
    Ok(pool.choose(rng).map(|member| (*member).clone()))
}

/// Current ring in orbit order.
///
/// # Errors
///
/// Returns storage errors.
pub fn list_urls(store: &OrbitStore) -> Result<Vec<String>, StoreError> {
    store.read_orbit()
}

/// Queue `url` for a membership check. Returns `false` if already queued.
///
/// # Errors
///
/// Returns `StoreError::Core` for an invalid URL and storage errors.
pub fn submit_url(store: &OrbitStore, url: &str) -> Result<bool, StoreError> {
    store.append_submission(url)
}

fn enroll(store: &OrbitStore, url: &str) -> Result<(), StoreError> {
    if store.append_submission(url)? {
        tracing::info!(url, "unknown page queued for checking");
    }
    Ok(())
}

//! Ring ordering.
//!
//! Members are sorted by `(sha256(capsule_prefix(url)), url)` rather than
//! alphabetically. The digest scatters capsules around the ring while staying
//! reproducible across processes. Pages of the same capsule share a digest
//! and stay adjacent, ordered by their full URL.

use sha2::{Digest, Sha256};

use crate::urls::capsule_prefix;

/// Sort key of one member URL.
pub type OrderKey = ([u8; 32], String);

/// Digest of the URL's capsule prefix.
///
/// URLs without a usable capsule prefix are hashed by their full text, which
/// keeps ordering total for any stored string.
#[must_use]
pub fn capsule_digest(url: &str) -> [u8; 32] {
    let prefix = capsule_prefix(url).unwrap_or_else(|_| url.to_string());
    Sha256::digest(prefix.as_bytes()).into()
}

#[must_use]
pub fn sort_key(url: &str) -> OrderKey {
    (capsule_digest(url), url.to_string())
}

/// Return `orbit` with `url` added and the ring re-sorted.
///
/// If `url` is already a member the ring is returned unchanged.
#[must_use]
pub fn insert(orbit: &[String], url: &str) -> Vec<String> {
    let mut next = orbit.to_vec();
    if orbit.iter().any(|member| member == url) {
        return next;
    }
    next.push(url.to_string());
    next.sort_by_cached_key(|member| sort_key(member));
    next
}

/// Return `orbit` without `url`. The remaining order is untouched.
#[must_use]
pub fn remove(orbit: &[String], url: &str) -> Vec<String> {
    orbit
        .iter()
        .filter(|member| *member != url)
        .cloned()
        .collect()
}

/// Position of a URL on the orbit in whole degrees, `0..360`.
///
/// Derived from the leading bytes of the ordering digest, so angles never
/// decrease when walking the ring forward.
#[must_use]
pub fn angle(url: &str) -> u16 {
    let digest = capsule_digest(url);
    let turn = u32::from(u16::from_be_bytes([digest[0], digest[1]]));
    // turn < 65536, so the result is < 360
    u16::try_from(turn * 360 / 65_536).unwrap_or(359)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    const PAGES: [&str; 6] = [
        "gemini://alpha.example/",
        "gemini://bravo.example/log/",
        "gemini://charlie.example/",
        "gemini://tilde.example/~delta/",
        "gemini://tilde.example/~echo/",
        "gemini://alpha.example/second.gmi",
    ];

    #[test]
    fn insertion_order_does_not_matter() {
        let forward = PAGES.iter().fold(Vec::new(), |ring, url| insert(&ring, url));
        let backward = PAGES
            .iter()
            .rev()
            .fold(Vec::new(), |ring, url| insert(&ring, url));
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), PAGES.len());
    }

    #[test]
    fn ring_is_sorted_by_key() {
        let ring = PAGES.iter().fold(Vec::new(), |ring, url| insert(&ring, url));
        let keys = ring.iter().map(|u| sort_key(u)).collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn insert_existing_member_is_identity() {
        let ring = PAGES.iter().fold(Vec::new(), |ring, url| insert(&ring, url));
        for url in PAGES {
            assert_eq!(insert(&ring, url), ring);
        }
    }

    #[test]
    fn same_capsule_pages_are_adjacent_and_url_ordered() {
        let ring = insert(
            &insert(&insert(&[], "gemini://bravo.example/"), "gemini://alpha.example/b"),
            "gemini://alpha.example/a",
        );
        let a = ring.iter().position(|u| u == "gemini://alpha.example/a").unwrap();
        let b = ring.iter().position(|u| u == "gemini://alpha.example/b").unwrap();
        assert_eq!(b, a + 1);
    }

    #[test]
    fn remove_keeps_order_of_remainder() {
        let ring = PAGES.iter().fold(Vec::new(), |ring, url| insert(&ring, url));
        let removed = remove(&ring, PAGES[2]);
        let expected = ring
            .iter()
            .filter(|u| *u != PAGES[2])
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(removed, expected);
        assert_eq!(remove(&removed, "gemini://absent.example/"), removed);
    }

    #[test]
    fn digest_is_sha256_of_prefix() {
        let expected: [u8; 32] = Sha256::digest(b"gemini://alpha.example/").into();
        assert_eq!(capsule_digest("gemini://alpha.example/deep/page.gmi"), expected);
    }

    #[test]
    fn angles_follow_ring_order() {
        let ring = PAGES.iter().fold(Vec::new(), |ring, url| insert(&ring, url));
        let angles = ring.iter().map(|u| angle(u)).collect::<Vec<_>>();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
        assert!(angles.iter().all(|a| *a < 360));
    }

    #[test]
    fn unparseable_entries_still_sort() {
        let ring = insert(&urls(&["gemini://alpha.example/"]), "not a url");
        assert_eq!(ring.len(), 2);
    }
}

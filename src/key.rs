//! Cache key derivation.
//!
//! A key is `"{controller}::Cache::{digest}"`. The digest depends on the
//! configured [`KeyStrategy`] and must stay identical across releases that
//! share a store, otherwise every lookup silently misses.

use crate::config::KeyStrategy;
use crate::host::Location;
use md5::{Digest, Md5};
use fnv::FnvHasher;
use std::hash::Hasher;

/// Separator between the controller name and the digest.
pub const KEY_INFIX: &str = "::Cache::";

/// Derive the snapshot key for `controller` at `location`.
///
/// # Example
///
/// ```
/// use navigator_restore::{cache_key, KeyStrategy, Location};
///
/// let location = Location::new("https://example.com/list?hoge");
/// assert_eq!(
///     cache_key("mock_controller", &location, KeyStrategy::QueryDigest),
///     "mock_controller::Cache::028edbcdb0fcb5cdaf8d99814ae5a17e"
/// );
/// ```
pub fn cache_key(controller: &str, location: &Location, strategy: KeyStrategy) -> String {
    let digest = match strategy {
        KeyStrategy::QueryDigest => query_digest(location.search()),
        KeyStrategy::FullLocation => full_location_hash(location.href()),
    };
    format!("{controller}{KEY_INFIX}{digest}")
}

/// MD5 hex of the search string, or an empty string when there is none.
fn query_digest(search: &str) -> String {
    if search.is_empty() {
        String::new()
    } else {
        hex::encode(Md5::digest(search.as_bytes()))
    }
}

/// FNV-1a 64 of the href bytes, independent of target word size.
fn full_location_hash(href: &str) -> String {
    let mut hasher = FnvHasher::default();
    hasher.write(href.as_bytes());
    format!("{:016x}", hasher.finish())
}

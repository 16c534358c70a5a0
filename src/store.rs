//! Expiring key/value store for snapshots.
//!
//! The store is split along two seams:
//!
//! - [`KeyValueBackend`] is the raw string store (local storage in a browser
//!   shell, a map in tests). [`MemoryBackend`] is the bundled implementation.
//! - [`SnapshotCache`] is what controllers talk to. [`ExpiringStore`] adds
//!   JSON encoding and time-to-live on top of a backend; [`DisabledStore`] is
//!   the no-op used outside the interactive context.
//!
//! Entries are written under [`STORE_PREFIX`] as
//! `{"key": .., "value": .., "expires_at": <RFC 3339>}`. Expired entries are
//! swept once, when the store is constructed.
//!
//! # Example
//!
//! ```
//! use navigator_restore::{ExpiringStore, MemoryBackend, SnapshotCache};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let store = ExpiringStore::new(MemoryBackend::new());
//! store.set("hoge", json!("fuga"), Duration::from_secs(60));
//! assert_eq!(store.get("hoge"), Some(json!("fuga")));
//! assert_eq!(store.get("missing"), None);
//! ```

use crate::{debug_log, trace_log, warn_log};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Prefix applied to every backend key written by [`ExpiringStore`].
pub const STORE_PREFIX: &str = "navigator-restore-";

// ============================================================================
// Clock
// ============================================================================

/// Wall-clock source used for expiry.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> OffsetDateTime;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// [`Clock`] that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = add_saturating(*now, by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn add_saturating(at: OffsetDateTime, by: Duration) -> OffsetDateTime {
    time::Duration::try_from(by)
        .ok()
        .and_then(|by| at.checked_add(by))
        .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc())
}

// ============================================================================
// Backend
// ============================================================================

/// Raw persistent string store.
pub trait KeyValueBackend: Send + Sync {
    /// Read the raw value under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String);

    /// Delete `key` if present.
    fn remove(&self, key: &str);

    /// List every key currently held.
    fn keys(&self) -> Vec<String>;
}

/// In-process [`KeyValueBackend`]. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw entries held, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` if the backend holds nothing.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.lock().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}

// ============================================================================
// SnapshotCache
// ============================================================================

/// Cache surface consumed by controllers.
///
/// Implementations never fail: a value that cannot be read back is absent.
pub trait SnapshotCache: Send + Sync {
    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Read the value under `key` if present and unexpired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Delete the entry under `key`.
    fn remove(&self, key: &str);

    /// Whether this cache actually stores anything.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Persisted entry layout.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: Value,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
}

/// JSON + TTL layer over a [`KeyValueBackend`].
pub struct ExpiringStore<B> {
    backend: B,
    clock: Arc<dyn Clock>,
}

impl<B: KeyValueBackend> ExpiringStore<B> {
    /// Create a store on the system clock, sweeping expired entries.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Create a store on a custom clock, sweeping expired entries.
    pub fn with_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        let store = Self { backend, clock };
        store.flush_expired();
        store
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn flush_expired(&self) {
        let now = self.clock.now();
        let mut flushed = 0usize;
        for raw_key in self.backend.keys() {
            if !raw_key.starts_with(STORE_PREFIX) {
                continue;
            }
            let expired = self
                .backend
                .get(&raw_key)
                .and_then(|raw| serde_json::from_str::<StoredEntry>(&raw).ok())
                .is_some_and(|entry| entry.expires_at <= now);
            if expired {
                self.backend.remove(&raw_key);
                flushed += 1;
            }
        }
        debug_log!("Swept {} expired snapshot entries", flushed);
    }
}

impl<B: KeyValueBackend> SnapshotCache for ExpiringStore<B> {
    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = StoredEntry {
            key: key.to_string(),
            value,
            expires_at: add_saturating(self.clock.now(), ttl),
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                trace_log!("Storing '{}' until {}", key, entry.expires_at);
                self.backend.set(&format!("{STORE_PREFIX}{key}"), raw);
            }
            Err(err) => warn_log!("Could not encode entry '{}': {}", key, err),
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        let raw_key = format!("{STORE_PREFIX}{key}");
        let raw = self.backend.get(&raw_key)?;
        let entry = match serde_json::from_str::<StoredEntry>(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn_log!("Dropping unreadable entry '{}': {}", key, err);
                self.backend.remove(&raw_key);
                return None;
            }
        };
        if entry.expires_at <= self.clock.now() {
            trace_log!("Entry '{}' expired at {}", key, entry.expires_at);
            self.backend.remove(&raw_key);
            return None;
        }
        Some(entry.value)
    }

    fn remove(&self, key: &str) {
        self.backend.remove(&format!("{STORE_PREFIX}{key}"));
    }
}

impl<B> std::fmt::Debug for ExpiringStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringStore").finish_non_exhaustive()
    }
}

/// [`SnapshotCache`] that stores nothing, for non-interactive contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl SnapshotCache for DisabledStore {
    fn set(&self, _key: &str, _value: Value, _ttl: Duration) {}

    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn remove(&self, _key: &str) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn clock() -> ManualClock {
        ManualClock::new(datetime!(2026-10-14 12:00 UTC))
    }

    fn store(backend: &MemoryBackend, clock: &ManualClock) -> ExpiringStore<MemoryBackend> {
        ExpiringStore::with_clock(backend.clone(), Arc::new(clock.clone()))
    }

    #[test]
    fn test_set_then_get() {
        let clock = clock();
        let store = store(&MemoryBackend::new(), &clock);
        store.set("hoge", json!({"a": [1, 2]}), Duration::from_secs(123 * 60));
        assert_eq!(store.get("hoge"), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_get_never_written() {
        let store = store(&MemoryBackend::new(), &clock());
        assert_eq!(store.get("nothing"), None);
    }

    #[test]
    fn test_entry_expires() {
        let clock = clock();
        let store = store(&MemoryBackend::new(), &clock);
        store.set("hoge", json!(1), Duration::from_secs(60));

        clock.advance(Duration::from_secs(59));
        assert_eq!(store.get("hoge"), Some(json!(1)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get("hoge"), None);
    }

    #[test]
    fn test_remove() {
        let store = store(&MemoryBackend::new(), &clock());
        store.set("hoge", json!(1), Duration::from_secs(60));
        store.remove("hoge");
        assert_eq!(store.get("hoge"), None);
    }

    #[test]
    fn test_overwrite_supersedes() {
        let store = store(&MemoryBackend::new(), &clock());
        store.set("hoge", json!(1), Duration::from_secs(60));
        store.set("hoge", json!(2), Duration::from_secs(60));
        assert_eq!(store.get("hoge"), Some(json!(2)));
    }

    #[test]
    fn test_sweep_on_construction() {
        let backend = MemoryBackend::new();
        let clock = clock();
        {
            let first = store(&backend, &clock);
            first.set("short", json!(1), Duration::from_secs(60));
            first.set("long", json!(2), Duration::from_secs(3600));
        }
        backend.set("foreign", "untouched".to_string());
        clock.advance(Duration::from_secs(120));

        let second = store(&backend, &clock);
        assert_eq!(backend.len(), 2);
        assert!(backend.get(&format!("{STORE_PREFIX}short")).is_none());
        assert_eq!(second.get("long"), Some(json!(2)));
        assert_eq!(backend.get("foreign").as_deref(), Some("untouched"));
    }

    #[test]
    fn test_unreadable_entry_is_absent() {
        let backend = MemoryBackend::new();
        let store = store(&backend, &clock());
        backend.set(&format!("{STORE_PREFIX}broken"), "{not json".to_string());

        assert_eq!(store.get("broken"), None);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let store = store(&MemoryBackend::new(), &clock());
        store.set("forever", json!(true), Duration::MAX);
        assert_eq!(store.get("forever"), Some(json!(true)));
    }

    #[test]
    fn test_disabled_store() {
        let store = DisabledStore;
        store.set("hoge", json!(1), Duration::from_secs(60));
        assert_eq!(store.get("hoge"), None);
        assert!(!store.is_enabled());
    }
}

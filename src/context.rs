//! Process-wide restoration context.
//!
//! [`RestoreContext`] is the single coordination point shared by every
//! controller: it owns the [`NavigationFlag`], the [`SnapshotCache`] and the
//! [`RestoreConfig`]. It is cheap to clone (all parts are reference counted)
//! and is passed explicitly to each [`PageController`](crate::PageController),
//! so tests can run independent contexts side by side.
//!
//! Applications that want one ambient instance use
//! [`RestoreContext::global`], which constructs it on first access.
//!
//! # Initialization
//!
//! ```
//! use navigator_restore::{MemoryBackend, RestoreConfig, RestoreContext};
//!
//! let ctx = RestoreContext::interactive(MemoryBackend::new(), RestoreConfig::default());
//! assert!(ctx.cache().is_enabled());
//!
//! let server = RestoreContext::non_interactive(RestoreConfig::default());
//! assert!(!server.cache().is_enabled());
//! ```

use crate::config::RestoreConfig;
use crate::host::Location;
use crate::key::cache_key;
use crate::navigation::NavigationFlag;
use crate::snapshot::Snapshot;
use crate::store::{Clock, DisabledStore, ExpiringStore, KeyValueBackend, SnapshotCache};
use crate::{debug_log, info_log, warn_log};
use std::sync::{Arc, OnceLock};

static GLOBAL_CONTEXT: OnceLock<RestoreContext> = OnceLock::new();

/// Shared navigation flag, snapshot cache and settings.
#[derive(Clone)]
pub struct RestoreContext {
    flag: NavigationFlag,
    cache: Arc<dyn SnapshotCache>,
    config: Arc<RestoreConfig>,
}

impl RestoreContext {
    /// Build a context around any cache implementation.
    pub fn new(cache: Arc<dyn SnapshotCache>, config: RestoreConfig) -> Self {
        Self {
            flag: NavigationFlag::new(),
            cache,
            config: Arc::new(config),
        }
    }

    /// Context for the interactive runtime, persisting into `backend`.
    ///
    /// Expired entries in `backend` are swept here, once.
    pub fn interactive<B>(backend: B, config: RestoreConfig) -> Self
    where
        B: KeyValueBackend + 'static,
    {
        Self::new(Arc::new(ExpiringStore::new(backend)), config)
    }

    /// Like [`interactive`](Self::interactive) with a custom clock.
    pub fn interactive_with_clock<B>(
        backend: B,
        clock: Arc<dyn Clock>,
        config: RestoreConfig,
    ) -> Self
    where
        B: KeyValueBackend + 'static,
    {
        Self::new(Arc::new(ExpiringStore::with_clock(backend, clock)), config)
    }

    /// Context for a non-interactive runtime; every cache call is a no-op.
    pub fn non_interactive(config: RestoreConfig) -> Self {
        Self::new(Arc::new(DisabledStore), config)
    }

    /// The process-wide context, built by `init` on first access.
    ///
    /// Later calls return the first instance and never run their `init`.
    pub fn global(init: impl FnOnce() -> Self) -> &'static Self {
        GLOBAL_CONTEXT.get_or_init(|| {
            info_log!("Initializing global restore context");
            init()
        })
    }

    /// The process-wide context, if it was already built.
    pub fn try_global() -> Option<&'static Self> {
        GLOBAL_CONTEXT.get()
    }

    /// The navigation flag.
    pub fn flag(&self) -> &NavigationFlag {
        &self.flag
    }

    /// The snapshot cache.
    pub fn cache(&self) -> &dyn SnapshotCache {
        self.cache.as_ref()
    }

    /// The settings.
    pub fn config(&self) -> &RestoreConfig {
        &self.config
    }

    /// Snapshot key for `controller` at `location` under the configured strategy.
    pub fn key_for(&self, controller: &str, location: &Location) -> String {
        cache_key(controller, location, self.config.key_strategy)
    }

    /// Write `snapshot` under `key` with the configured TTL.
    pub fn store_snapshot(&self, key: &str, snapshot: &Snapshot) -> serde_json::Result<()> {
        let value = snapshot.to_value()?;
        self.cache.set(key, value, self.config.ttl);
        debug_log!("Captured snapshot under '{}'", key);
        Ok(())
    }

    /// Read the snapshot under `key`.
    ///
    /// A record that does not decode is removed and reported as a miss.
    pub fn load_snapshot(&self, key: &str) -> Option<Snapshot> {
        let Some(value) = self.cache.get(key) else {
            debug_log!("Snapshot cache miss for '{}'", key);
            return None;
        };
        match Snapshot::from_value(value) {
            Ok(snapshot) => {
                debug_log!("Snapshot cache hit for '{}'", key);
                Some(snapshot)
            }
            Err(err) => {
                warn_log!("Discarding malformed snapshot under '{}': {}", key, err);
                self.cache.remove(key);
                None
            }
        }
    }
}

impl std::fmt::Debug for RestoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreContext")
            .field("flag", &self.flag)
            .field("cache_enabled", &self.cache.is_enabled())
            .field("config", &self.config)
            .finish()
    }
}

//! Restoration settings shared by every controller in a [`RestoreContext`].
//!
//! [`RestoreContext`]: crate::RestoreContext

use std::time::Duration;

/// Default snapshot lifetime: 15 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Attribute carrying parameters injected by the hosting server.
pub const SERVER_PARAMS_KEY: &str = "X-SERVER-PARAMS";

/// How the content part of a cache key is derived.
///
/// Both strategies produce stable keys, but keys from one never match keys
/// from the other. Switching strategy orphans every outstanding entry until
/// it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// MD5 hex digest of `location.search` only; empty when there is no query.
    #[default]
    QueryDigest,
    /// FNV-1a 64 of the full `location.href`, rendered as 16 hex digits.
    FullLocation,
}

/// Settings for snapshot capture and restore.
///
/// # Example
///
/// ```
/// use navigator_restore::{KeyStrategy, RestoreConfig};
/// use std::time::Duration;
///
/// let config = RestoreConfig::new()
///     .with_ttl(Duration::from_secs(60))
///     .with_key_strategy(KeyStrategy::FullLocation);
///
/// assert_eq!(config.ttl, Duration::from_secs(60));
/// assert_eq!(config.server_params_key, "X-SERVER-PARAMS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreConfig {
    /// Lifetime of a captured snapshot.
    pub ttl: Duration,
    /// Cache key derivation.
    pub key_strategy: KeyStrategy,
    /// Attribute name holding server-injected params.
    pub server_params_key: String,
}

impl RestoreConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            key_strategy: KeyStrategy::default(),
            server_params_key: SERVER_PARAMS_KEY.to_string(),
        }
    }

    /// Set the snapshot lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the cache key derivation.
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Set the attribute name carrying server-injected params.
    pub fn with_server_params_key(mut self, key: impl Into<String>) -> Self {
        self.server_params_key = key.into();
        self
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RestoreConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.key_strategy, KeyStrategy::QueryDigest);
        assert_eq!(config.server_params_key, SERVER_PARAMS_KEY);
    }

    #[test]
    fn test_builder() {
        let config = RestoreConfig::new()
            .with_ttl(Duration::from_secs(5))
            .with_server_params_key("X-PARAMS");
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.server_params_key, "X-PARAMS");
    }
}

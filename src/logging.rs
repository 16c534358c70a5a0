//! Logging facade.
//!
//! Every diagnostic emitted by this crate goes through the macros below,
//! which forward to [`log`](https://docs.rs/log) or
//! [`tracing`](https://docs.rs/tracing) depending on the enabled feature.
//! Enable at most one of the two.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Records are emitted under the `navigator_restore` target so hosts can
//! filter them with `RUST_LOG=navigator_restore=debug`.
//!
//! ```ignore
//! use navigator_restore::{debug_log, warn_log};
//!
//! debug_log!("Snapshot cache hit for '{}'", key);
//! warn_log!("Discarding malformed snapshot under '{}'", key);
//! ```

/// Internal dispatcher shared by the level macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __restore_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: "navigator_restore", $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: "navigator_restore", $($arg)*);
    }};
}

/// Emit a trace-level record. Used for navigation flag flips.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__restore_log!(trace, $($arg)*) };
}

/// Emit a debug-level record. Used for cache hits, misses and captures.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__restore_log!(debug, $($arg)*) };
}

/// Emit an info-level record.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__restore_log!(info, $($arg)*) };
}

/// Emit a warn-level record. Used for malformed snapshots and hard reloads.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__restore_log!(warn, $($arg)*) };
}

/// Emit an error-level record.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__restore_log!(error, $($arg)*) };
}

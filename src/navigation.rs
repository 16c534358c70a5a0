//! Navigation direction signal.
//!
//! The host reports history activity as [`HistoryEvent`]s. Only two of them
//! write the [`NavigationFlag`]: a pop marks the transition as backward (the
//! snapshot cache is consulted), a push marks it forward (the cache is
//! bypassed and later superseded). The load decision is the only reader.

use crate::trace_log;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Direction of the transition currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationDirection {
    /// Push or initial load: rebuild state, reset scroll.
    #[default]
    Forward,
    /// History pop: replay a cached snapshot if one exists.
    Backward,
}

impl NavigationDirection {
    /// Whether the snapshot cache should be consulted.
    pub fn uses_cache(self) -> bool {
        matches!(self, Self::Backward)
    }
}

/// History activity reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    /// A new entry was pushed.
    Pushed,
    /// The user went back (or forward) through existing entries.
    Popped,
    /// The current entry is about to change; capture state now.
    Changed,
}

/// Shared backward/forward flag. Clones observe the same value.
///
/// ```
/// use navigator_restore::{NavigationDirection, NavigationFlag};
///
/// let flag = NavigationFlag::new();
/// assert_eq!(flag.direction(), NavigationDirection::Forward);
///
/// flag.on_pop_history();
/// assert!(flag.is_backward());
///
/// flag.on_push_history();
/// assert!(!flag.is_backward());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationFlag {
    backward: Arc<AtomicBool>,
}

impl NavigationFlag {
    /// Create a flag in the forward state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the transition as backward.
    pub fn on_pop_history(&self) {
        trace_log!("Navigation flag: backward");
        self.backward.store(true, Ordering::SeqCst);
    }

    /// Mark the transition as forward.
    pub fn on_push_history(&self) {
        trace_log!("Navigation flag: forward");
        self.backward.store(false, Ordering::SeqCst);
    }

    /// Whether the current transition is backward.
    pub fn is_backward(&self) -> bool {
        self.backward.load(Ordering::SeqCst)
    }

    /// Current direction.
    pub fn direction(&self) -> NavigationDirection {
        if self.is_backward() {
            NavigationDirection::Backward
        } else {
            NavigationDirection::Forward
        }
    }
}

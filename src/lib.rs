//! # navigator-restore
//!
//! Back/forward state restoration for page controllers in a client-rendered
//! application.
//!
//! On every navigation a [`PageController`] decides whether its visible
//! state (a view-model plus scroll position) is replayed from a short-lived
//! snapshot cache or rebuilt by its load routine, and it runs the
//! controller's declared before/after actions around that decision.
//!
//! ## Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`RestoreContext`] | shared [`NavigationFlag`], [`SnapshotCache`] and [`RestoreConfig`] |
//! | [`ExpiringStore`] | JSON + TTL cache over a [`KeyValueBackend`] |
//! | [`Snapshot`] | cached view-model and [`ScrollPosition`] |
//! | [`ActionBuilder`] | declares before/after actions for a [`Controller`] |
//! | [`ParamWatch`] | detects param changes that trigger a reload |
//! | [`PageController`] | the per-instance state machine |
//!
//! The rendering host plugs in through [`Host`] and [`Scroller`]. Outside
//! the interactive context use [`RestoreContext::non_interactive`] and
//! [`NoopScroller`]; the state machine then simply never finds a snapshot.
//!
//! ## Feature flags
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `log` | yes | diagnostics through the `log` crate |
//! | `tracing` | no | diagnostics through the `tracing` crate |

pub mod actions;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod host;
pub mod key;
pub mod logging;
pub mod navigation;
pub mod params;
pub mod snapshot;
pub mod store;
pub mod views;

pub use actions::{Action, ActionBuilder, ActionFn, ActionPipeline};
pub use config::{KeyStrategy, RestoreConfig, DEFAULT_TTL, SERVER_PARAMS_KEY};
pub use context::RestoreContext;
pub use controller::{Controller, LoadOutcome, PageController, Phase, UpdateOutcome};
pub use error::{ControllerError, ControllerResult, ErrorDescriptor};
pub use host::{Attrs, Host, Location, NoopScroller, Scroller};
pub use key::cache_key;
pub use navigation::{HistoryEvent, NavigationDirection, NavigationFlag};
pub use params::{ParamChange, ParamWatch, Params};
pub use snapshot::{ScrollPosition, Snapshot, ViewModel};
pub use store::{
    Clock, DisabledStore, ExpiringStore, KeyValueBackend, ManualClock, MemoryBackend,
    SnapshotCache, SystemClock,
};
pub use views::ViewSelection;

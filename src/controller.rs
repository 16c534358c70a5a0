//! Page controller state machine.
//!
//! A [`Controller`] is the application's definition of one logical page: its
//! name, views, view-model and load hooks, plus the actions it declares via
//! [`Controller::define`]. A [`PageController`] wraps one instance of it and
//! drives the lifecycle the rendering host reports:
//!
//! ```text
//! Uninitialized --on_init--> Loading --> Loaded
//!                              ^           |
//!                              +-----------+  params changed / reload
//! any --raise (interactive)--> Error
//! ```
//!
//! # Load decision
//!
//! On every [`load`](PageController::load):
//!
//! - **backward + snapshot hit**: the cached view-model fields are applied,
//!   the scroll position is restored after the next paint, and the load
//!   routine is skipped.
//! - **forward, or miss**: scroll jumps to the origin, then the load routine
//!   runs (before actions, then [`Controller::on_load`]).
//!
//! Either way the loaded routine follows (after actions, then
//! [`Controller::on_loaded`]). Exactly one of "jump to origin" and "restore
//! scroll" happens per load.
//!
//! # Capture
//!
//! [`HistoryEvent::Changed`] stores the live view-model and the current
//! scroll offset under the controller's cache key. Removing a controller
//! never captures.
//!
//! Every driving method takes `&mut self`, so a second load on the same
//! controller cannot begin until the first one finished. A completion from a
//! superseded load can therefore never land after a newer one.

use crate::actions::{ActionBuilder, ActionPipeline};
use crate::context::RestoreContext;
use crate::error::{ControllerError, ControllerResult, ErrorDescriptor};
use crate::host::{Attrs, Host, Scroller};
use crate::navigation::HistoryEvent;
use crate::params::{ParamChange, ParamWatch, Params};
use crate::snapshot::{ScrollPosition, Snapshot, ViewModel};
use crate::views::ViewSelection;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::rc::Rc;

/// Application-side definition of a page.
///
/// # Example
///
/// ```
/// use futures::future::LocalBoxFuture;
/// use navigator_restore::{ActionBuilder, Controller, ControllerResult, ViewModel};
///
/// #[derive(Default)]
/// struct Articles {
///     vm: Option<ViewModel>,
/// }
///
/// impl Articles {
///     fn fetch(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
///         Box::pin(async move {
///             self.view_model_mut().set("items", vec!["first", "second"]);
///             Ok(())
///         })
///     }
/// }
///
/// impl Controller for Articles {
///     fn name(&self) -> &str {
///         "articles"
///     }
///
///     fn define(actions: &mut ActionBuilder<Self>) {
///         actions.before_action("fetch", Self::fetch);
///     }
///
///     fn view_model(&self) -> Option<&ViewModel> {
///         self.vm.as_ref()
///     }
///
///     fn view_model_mut(&mut self) -> &mut ViewModel {
///         self.vm.get_or_insert_with(ViewModel::new)
///     }
/// }
/// ```
pub trait Controller: Sized + 'static {
    /// Registered name; prefixes the cache key and names the default view.
    fn name(&self) -> &str;

    /// Component kind reported to the host registry.
    fn kind(&self) -> &'static str {
        "controller"
    }

    /// Declared views, outermost first. Empty selects the default layout.
    fn views(&self) -> Vec<String> {
        Vec::new()
    }

    /// Declare before/after actions. Called once per instance, before
    /// anything else.
    fn define(_actions: &mut ActionBuilder<Self>) {}

    /// Live view-model, or `None` before one exists.
    fn view_model(&self) -> Option<&ViewModel>;

    /// Live view-model, created on demand.
    fn view_model_mut(&mut self) -> &mut ViewModel;

    /// Tail of the load routine, after the before actions. Not called on a
    /// snapshot restore.
    fn on_load(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        future::ok(()).boxed_local()
    }

    /// Tail of the loaded routine, after the after actions. Called on every load.
    fn on_loaded(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        future::ok(()).boxed_local()
    }

    /// Params moved from `older` to `newer`.
    ///
    /// Return `true` (the default) to have the page reload in place. Return
    /// `false` when the controller applied the change itself; no load runs.
    /// A recorded error forces a hard reload regardless.
    fn on_params_changed(&mut self, _newer: &Params, _older: &Params) -> bool {
        true
    }
}

/// Lifecycle phase of a [`PageController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// `on_init` has not run.
    #[default]
    Uninitialized,
    /// A load is in progress, or the last one failed.
    Loading,
    /// The last load completed.
    Loaded,
    /// An error was raised; loads keep this phase, only a navigation
    /// (a fresh controller) leaves it.
    Error,
}

/// How a load obtained its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Replayed from a cached snapshot; the load routine was skipped.
    Restored,
    /// Rebuilt by the load routine.
    Loaded,
}

/// Result of an update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First observation; params recorded, nothing reloaded.
    Baseline,
    /// Params equal the baseline.
    Unchanged,
    /// Params changed and the controller reloaded in place.
    Reloaded(LoadOutcome),
    /// Params changed and [`Controller::on_params_changed`] declined the reload.
    Handled,
    /// Params changed while an error was recorded; a hard reload was requested.
    HardReload,
}

/// One live controller instance bound to a host.
pub struct PageController<C: Controller> {
    controller: C,
    actions: ActionPipeline<C>,
    ctx: RestoreContext,
    host: Rc<dyn Host>,
    scroller: Rc<dyn Scroller>,
    watch: ParamWatch,
    views: ViewSelection,
    phase: Phase,
    error: Option<ErrorDescriptor>,
    listening: bool,
    generation: u64,
}

impl<C: Controller> PageController<C> {
    /// Wrap `controller`, building its action lists first.
    pub fn new(
        controller: C,
        ctx: RestoreContext,
        host: Rc<dyn Host>,
        scroller: Rc<dyn Scroller>,
    ) -> Self {
        let mut builder = ActionBuilder::new();
        C::define(&mut builder);
        let actions = builder.build();
        let views = ViewSelection::resolve(controller.name(), &controller.views());

        Self {
            controller,
            actions,
            ctx,
            host,
            scroller,
            watch: ParamWatch::new(),
            views,
            phase: Phase::Uninitialized,
            error: None,
            listening: false,
            generation: 0,
        }
    }

    // ========================================================================
    // Host lifecycle hooks
    // ========================================================================

    /// Initialize: record params, attach to history events, then load.
    ///
    /// Resolves once both the load and loaded routines have finished.
    pub async fn on_init(&mut self, attrs: &Attrs) -> ControllerResult<LoadOutcome> {
        let params = self.params(attrs);
        self.watch = ParamWatch::new();
        self.watch.observe(&params);
        self.listening = true;
        info_log!(
            "{} '{}' initialized",
            self.controller.kind(),
            self.controller.name()
        );
        self.load().await
    }

    /// Update pass: reload if params changed since the last pass.
    pub async fn on_update(&mut self, attrs: &Attrs) -> ControllerResult<UpdateOutcome> {
        let params = self.params(attrs);
        let older = match self.watch.observe(&params) {
            ParamChange::Initial => return Ok(UpdateOutcome::Baseline),
            ParamChange::Unchanged => return Ok(UpdateOutcome::Unchanged),
            ParamChange::Changed { older } => older,
        };

        debug_log!("Params changed for '{}'", self.controller.name());
        let reload = self.controller.on_params_changed(&params, &older);

        if let Some(error) = &self.error {
            warn_log!(
                "Params changed with recorded error ({}); requesting hard reload",
                error
            );
            self.host.hard_reload();
            return Ok(UpdateOutcome::HardReload);
        }
        if !reload {
            return Ok(UpdateOutcome::Handled);
        }

        self.load().await.map(UpdateOutcome::Reloaded)
    }

    /// Detach from history events. Never captures.
    pub fn on_remove(&mut self) {
        trace_log!("Controller '{}' removed", self.controller.name());
        self.listening = false;
    }

    /// Dispatch a history event from the host.
    ///
    /// Ignored unless the controller is initialized and not removed.
    pub fn handle_history(&mut self, event: HistoryEvent) -> ControllerResult<()> {
        if !self.listening {
            return Ok(());
        }
        match event {
            HistoryEvent::Pushed => self.on_push_history(),
            HistoryEvent::Popped => self.on_pop_history(),
            HistoryEvent::Changed => {
                self.capture()?;
            }
        }
        Ok(())
    }

    /// Mark the next load as forward.
    pub fn on_push_history(&self) {
        self.ctx.flag().on_push_history();
    }

    /// Mark the next load as backward.
    pub fn on_pop_history(&self) {
        self.ctx.flag().on_pop_history();
    }

    // ========================================================================
    // Load / capture
    // ========================================================================

    /// Restore from the snapshot cache or run the load routine, then run the
    /// loaded routine.
    pub async fn load(&mut self) -> ControllerResult<LoadOutcome> {
        self.generation += 1;
        if self.error.is_none() {
            self.phase = Phase::Loading;
        }

        let restored = if self.ctx.flag().is_backward() {
            self.ctx.load_snapshot(&self.cache_key())
        } else {
            None
        };

        let outcome = match restored {
            Some(snapshot) => {
                self.controller
                    .view_model_mut()
                    .set_attributes(&snapshot.viewmodel);
                self.scroller.next_frame().await;
                self.scroller.animate_to(snapshot.position).await;
                LoadOutcome::Restored
            }
            None => {
                self.scroller.jump_to(ScrollPosition::ORIGIN);
                self.actions.run_before(&mut self.controller).await?;
                self.controller.on_load().await?;
                LoadOutcome::Loaded
            }
        };

        self.actions.run_after(&mut self.controller).await?;
        self.controller.on_loaded().await?;

        if self.error.is_none() {
            self.phase = Phase::Loaded;
        }
        debug_log!(
            "Controller '{}' load #{} finished: {:?}",
            self.controller.name(),
            self.generation,
            outcome
        );
        self.host.request_redraw();
        Ok(outcome)
    }

    /// Store the live view-model and scroll offset under the cache key.
    ///
    /// Returns `false` without touching the cache when no view-model exists yet.
    pub fn capture(&self) -> ControllerResult<bool> {
        let Some(vm) = self.controller.view_model() else {
            trace_log!("No view-model for '{}'; skipping capture", self.controller.name());
            return Ok(false);
        };
        let snapshot = Snapshot::new(vm.clone(), self.scroller.position());
        self.ctx.store_snapshot(&self.cache_key(), &snapshot)?;
        Ok(true)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Signal an application error.
    ///
    /// Interactive: record it, narrow the views to the error view and request
    /// a redraw. Otherwise: return it as [`ControllerError::Raised`] for the
    /// hosting server to translate.
    pub fn raise(&mut self, code: u16, message: impl Into<String>) -> ControllerResult<()> {
        let message = message.into();
        if !self.host.is_interactive() {
            error_log!("Controller '{}' raised {}: {}", self.controller.name(), code, message);
            return Err(ControllerError::raised(code, message));
        }

        warn_log!(
            "Controller '{}' showing error {}: {}",
            self.controller.name(),
            code,
            message
        );
        self.error = Some(ErrorDescriptor::new(code, message));
        self.views.narrow_to_error();
        self.phase = Phase::Error;
        self.host.request_redraw();
        Ok(())
    }

    /// The recorded error, if any.
    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current params: host route params when interactive, otherwise the
    /// server-injected attribute.
    pub fn params(&self, attrs: &Attrs) -> Params {
        if self.host.is_interactive() {
            self.host.route_params()
        } else {
            let key = self.ctx.config().server_params_key.as_str();
            Params::from_value(attrs.get(key).unwrap_or(&Value::Null))
        }
    }

    /// Snapshot key for the current location.
    pub fn cache_key(&self) -> String {
        self.ctx.key_for(self.controller.name(), &self.host.location())
    }

    /// Params recorded by the last update pass.
    pub fn baseline_params(&self) -> Option<&Params> {
        self.watch.baseline()
    }

    /// The wrapped definition.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// The wrapped definition, mutably.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// The frozen action lists.
    pub fn actions(&self) -> &ActionPipeline<C> {
        &self.actions
    }

    /// Current view selection.
    pub fn views(&self) -> &ViewSelection {
        &self.views
    }

    /// Current view selection, mutably (for fragment caching).
    pub fn views_mut(&mut self) -> &mut ViewSelection {
        &mut self.views
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of loads started so far.
    pub fn load_generation(&self) -> u64 {
        self.generation
    }

    /// Whether history events reach this controller.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// The shared context.
    pub fn context(&self) -> &RestoreContext {
        &self.ctx
    }
}

impl<C: Controller> std::fmt::Debug for PageController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageController")
            .field("name", &self.controller.name())
            .field("phase", &self.phase)
            .field("error", &self.error)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

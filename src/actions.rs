//! Before/after action pipeline.
//!
//! A controller definition declares, once, an ordered list of named steps to
//! run before its load routine and another to run after load completes:
//!
//! 1. **before actions**: in registration order, each awaited to completion
//!    before the next starts; skipped entirely on a snapshot restore.
//! 2. **load hook**: [`Controller::on_load`](crate::Controller::on_load).
//! 3. **after actions**: in registration order, on every load, restored or not.
//! 4. **loaded hook**: [`Controller::on_loaded`](crate::Controller::on_loaded).
//!
//! Actions are plain function pointers bound to the controller type, so a
//! registration always refers to a method that exists. Registering the same
//! action twice runs it twice.
//!
//! # Example
//!
//! ```
//! use futures::future::LocalBoxFuture;
//! use navigator_restore::{ActionBuilder, ControllerResult};
//!
//! #[derive(Default)]
//! struct Page {
//!     steps: Vec<&'static str>,
//! }
//!
//! impl Page {
//!     fn fetch(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
//!         Box::pin(async move {
//!             self.steps.push("fetch");
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let mut builder = ActionBuilder::new();
//! builder.before_action("fetch", Page::fetch).before_action("fetch", Page::fetch);
//! let pipeline = builder.build();
//!
//! let mut page = Page::default();
//! pollster::block_on(pipeline.run_before(&mut page)).unwrap();
//! assert_eq!(page.steps, ["fetch", "fetch"]);
//! ```

use crate::error::ControllerResult;
use crate::trace_log;
use futures::future::LocalBoxFuture;

/// Signature of an action bound to controller type `C`.
pub type ActionFn<C> = for<'a> fn(&'a mut C) -> LocalBoxFuture<'a, ControllerResult<()>>;

/// A named, typed action.
pub struct Action<C> {
    name: String,
    run: ActionFn<C>,
}

impl<C> Action<C> {
    /// Create an action.
    pub fn new(name: impl Into<String>, run: ActionFn<C>) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }

    /// Registered name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the action on `controller`.
    pub fn invoke<'a>(&self, controller: &'a mut C) -> LocalBoxFuture<'a, ControllerResult<()>> {
        (self.run)(controller)
    }
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            run: self.run,
        }
    }
}

impl<C> std::fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

/// Registration surface used while a controller is being defined.
pub struct ActionBuilder<C> {
    before: Vec<Action<C>>,
    after: Vec<Action<C>>,
}

impl<C> ActionBuilder<C> {
    /// Create a builder with no actions.
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Append an action to run before the load routine.
    pub fn before_action(&mut self, name: impl Into<String>, run: ActionFn<C>) -> &mut Self {
        self.before.push(Action::new(name, run));
        self
    }

    /// Append an action to run after load completes.
    pub fn after_action(&mut self, name: impl Into<String>, run: ActionFn<C>) -> &mut Self {
        self.after.push(Action::new(name, run));
        self
    }

    /// Freeze the two lists.
    pub fn build(self) -> ActionPipeline<C> {
        ActionPipeline {
            before: self.before,
            after: self.after,
        }
    }
}

impl<C> Default for ActionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen before/after lists attached to one controller instance.
pub struct ActionPipeline<C> {
    before: Vec<Action<C>>,
    after: Vec<Action<C>>,
}

impl<C> ActionPipeline<C> {
    /// Before actions in execution order.
    pub fn before_actions(&self) -> &[Action<C>] {
        &self.before
    }

    /// After actions in execution order.
    pub fn after_actions(&self) -> &[Action<C>] {
        &self.after
    }

    /// Run every before action, stopping at the first failure.
    pub async fn run_before(&self, controller: &mut C) -> ControllerResult<()> {
        run_sequence("before", &self.before, controller).await
    }

    /// Run every after action, stopping at the first failure.
    pub async fn run_after(&self, controller: &mut C) -> ControllerResult<()> {
        run_sequence("after", &self.after, controller).await
    }
}

impl<C> std::fmt::Debug for ActionPipeline<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionPipeline")
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}

async fn run_sequence<C>(
    phase: &'static str,
    actions: &[Action<C>],
    controller: &mut C,
) -> ControllerResult<()> {
    for action in actions {
        trace_log!("Running {} action '{}'", phase, action.name());
        action.invoke(controller).await?;
    }
    Ok(())
}

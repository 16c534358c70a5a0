//! Test fixtures shared by the integration tests.
//!
//! Provides a recording host, a recording scroller and a `mock` controller
//! whose hooks and actions append to one shared event log, so tests can
//! assert on the exact interleaving of scroll, load and action steps.

#![allow(dead_code)]

use futures::future::{FutureExt, LocalBoxFuture};
use navigator_restore::*;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use time::macros::datetime;

/// Shared, ordered event log.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Future that is pending exactly once, to force a real suspension point.
pub struct YieldOnce {
    yielded: bool,
}

pub fn yield_once() -> YieldOnce {
    YieldOnce { yielded: false }
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

// ============================================================================
// Host
// ============================================================================

pub struct MockHost {
    pub interactive: bool,
    pub location: RefCell<Location>,
    pub route_params: RefCell<Params>,
    pub redraws: Cell<usize>,
    pub hard_reloads: Cell<usize>,
}

impl MockHost {
    pub fn interactive(href: &str) -> Rc<Self> {
        Rc::new(Self {
            interactive: true,
            location: RefCell::new(Location::new(href)),
            route_params: RefCell::new(Params::new()),
            redraws: Cell::new(0),
            hard_reloads: Cell::new(0),
        })
    }

    pub fn server() -> Rc<Self> {
        Rc::new(Self {
            interactive: false,
            location: RefCell::new(Location::default()),
            route_params: RefCell::new(Params::new()),
            redraws: Cell::new(0),
            hard_reloads: Cell::new(0),
        })
    }

    pub fn navigate(&self, href: &str) {
        *self.location.borrow_mut() = Location::new(href);
        *self.route_params.borrow_mut() = Params::from_query_string(Location::new(href).search());
    }
}

impl Host for MockHost {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn route_params(&self) -> Params {
        self.route_params.borrow().clone()
    }

    fn request_redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }

    fn hard_reload(&self) {
        self.hard_reloads.set(self.hard_reloads.get() + 1);
    }
}

// ============================================================================
// Scroller
// ============================================================================

pub struct MockScroller {
    pub position: Cell<ScrollPosition>,
    pub log: EventLog,
    pub jumps: RefCell<Vec<ScrollPosition>>,
    pub animations: RefCell<Vec<ScrollPosition>>,
}

impl MockScroller {
    pub fn new(log: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            position: Cell::new(ScrollPosition::ORIGIN),
            log: Rc::clone(log),
            jumps: RefCell::new(Vec::new()),
            animations: RefCell::new(Vec::new()),
        })
    }
}

impl Scroller for MockScroller {
    fn position(&self) -> ScrollPosition {
        self.position.get()
    }

    fn jump_to(&self, position: ScrollPosition) {
        self.log.borrow_mut().push(format!("jump:{},{}", position.x, position.y));
        self.jumps.borrow_mut().push(position);
        self.position.set(position);
    }

    fn animate_to(&self, position: ScrollPosition) -> LocalBoxFuture<'static, ()> {
        self.log.borrow_mut().push(format!("animate:{},{}", position.x, position.y));
        self.animations.borrow_mut().push(position);
        self.position.set(position);
        yield_once().boxed_local()
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        let log = Rc::clone(&self.log);
        async move {
            yield_once().await;
            log.borrow_mut().push("frame".to_string());
        }
        .boxed_local()
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct MockController {
    pub vm: Option<ViewModel>,
    pub log: EventLog,
    pub load_calls: usize,
    pub loaded_calls: usize,
    pub param_changes: Vec<(Params, Params)>,
    pub fail_load: bool,
    pub reload_on_change: bool,
}

impl MockController {
    pub fn new(log: &EventLog) -> Self {
        Self {
            vm: None,
            log: Rc::clone(log),
            load_calls: 0,
            loaded_calls: 0,
            param_changes: Vec::new(),
            fail_load: false,
            reload_on_change: true,
        }
    }

    fn push(&self, event: &str) {
        self.log.borrow_mut().push(event.to_string());
    }

    fn prepare(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            self.push("before:prepare:start");
            yield_once().await;
            self.push("before:prepare:end");
            Ok(())
        })
    }

    fn fetch(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            self.push("before:fetch");
            self.view_model_mut().set("hoge", "loaded");
            Ok(())
        })
    }

    fn track(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            self.push("after:track");
            Ok(())
        })
    }
}

impl Controller for MockController {
    fn name(&self) -> &str {
        "mock"
    }

    fn define(actions: &mut ActionBuilder<Self>) {
        actions
            .before_action("prepare", Self::prepare)
            .before_action("fetch", Self::fetch)
            .after_action("track", Self::track);
    }

    fn view_model(&self) -> Option<&ViewModel> {
        self.vm.as_ref()
    }

    fn view_model_mut(&mut self) -> &mut ViewModel {
        self.vm.get_or_insert_with(ViewModel::new)
    }

    fn on_load(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            self.load_calls += 1;
            self.push("load");
            if self.fail_load {
                Err(ControllerError::load("backend unavailable"))
            } else {
                Ok(())
            }
        })
    }

    fn on_loaded(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            self.loaded_calls += 1;
            self.push("loaded");
            Ok(())
        })
    }

    fn on_params_changed(&mut self, newer: &Params, older: &Params) -> bool {
        self.param_changes.push((newer.clone(), older.clone()));
        self.reload_on_change
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub fn test_clock() -> ManualClock {
    ManualClock::new(datetime!(2026-10-14 09:00 UTC))
}

pub fn interactive_context(clock: &ManualClock) -> RestoreContext {
    RestoreContext::interactive_with_clock(
        MemoryBackend::new(),
        Arc::new(clock.clone()),
        RestoreConfig::default(),
    )
}

pub struct Fixture {
    pub page: PageController<MockController>,
    pub host: Rc<MockHost>,
    pub scroller: Rc<MockScroller>,
    pub log: EventLog,
}

pub fn fixture(ctx: &RestoreContext, host: &Rc<MockHost>) -> Fixture {
    let log = event_log();
    let scroller = MockScroller::new(&log);
    let page = PageController::new(
        MockController::new(&log),
        ctx.clone(),
        Rc::clone(host) as Rc<dyn Host>,
        Rc::clone(&scroller) as Rc<dyn Scroller>,
    );
    Fixture {
        page,
        host: Rc::clone(host),
        scroller,
        log,
    }
}

pub fn no_attrs() -> Attrs {
    Attrs::new()
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

pub const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);

//! Walk one page through a forward visit, a capture and a back navigation.
//!
//! Run with `RUST_LOG=debug cargo run --example restore_demo` to see the
//! cache decisions.

use futures::future::LocalBoxFuture;
use navigator_restore::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct ConsoleHost {
    location: RefCell<Location>,
}

impl ConsoleHost {
    fn visit(&self, href: &str) {
        println!("-> {href}");
        *self.location.borrow_mut() = Location::new(href);
    }
}

impl Host for ConsoleHost {
    fn is_interactive(&self) -> bool {
        true
    }

    fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn route_params(&self) -> Params {
        Params::from_query_string(self.location.borrow().search())
    }

    fn request_redraw(&self) {
        println!("   redraw");
    }

    fn hard_reload(&self) {
        println!("   hard reload");
    }
}

#[derive(Default)]
struct WindowScroller {
    offset: Cell<ScrollPosition>,
}

impl Scroller for WindowScroller {
    fn position(&self) -> ScrollPosition {
        self.offset.get()
    }

    fn jump_to(&self, position: ScrollPosition) {
        println!("   scroll jump to ({}, {})", position.x, position.y);
        self.offset.set(position);
    }

    fn animate_to(&self, position: ScrollPosition) -> LocalBoxFuture<'static, ()> {
        println!("   scroll animate to ({}, {})", position.x, position.y);
        self.offset.set(position);
        Box::pin(async {})
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        Box::pin(async {})
    }
}

#[derive(Default)]
struct Articles {
    vm: Option<ViewModel>,
}

impl Articles {
    fn fetch(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            println!("   fetching articles");
            self.view_model_mut()
                .set("articles", vec!["Introducing snapshots", "Scroll restoration"]);
            Ok(())
        })
    }

    fn track(&mut self) -> LocalBoxFuture<'_, ControllerResult<()>> {
        Box::pin(async move {
            println!("   page view tracked");
            Ok(())
        })
    }
}

impl Controller for Articles {
    fn name(&self) -> &str {
        "articles"
    }

    fn define(actions: &mut ActionBuilder<Self>) {
        actions
            .before_action("fetch", Self::fetch)
            .after_action("track", Self::track);
    }

    fn view_model(&self) -> Option<&ViewModel> {
        self.vm.as_ref()
    }

    fn view_model_mut(&mut self) -> &mut ViewModel {
        self.vm.get_or_insert_with(ViewModel::new)
    }
}

fn mount(host: &Rc<ConsoleHost>) -> (PageController<Articles>, Rc<WindowScroller>) {
    let ctx = RestoreContext::global(|| {
        RestoreContext::interactive(MemoryBackend::new(), RestoreConfig::default())
    });
    let scroller = Rc::new(WindowScroller::default());
    let page = PageController::new(
        Articles::default(),
        ctx.clone(),
        Rc::clone(host) as Rc<dyn Host>,
        Rc::clone(&scroller) as Rc<dyn Scroller>,
    );
    (page, scroller)
}

fn main() -> Result<(), ControllerError> {
    env_logger::init();

    let host = Rc::new(ConsoleHost {
        location: RefCell::new(Location::default()),
    });
    let attrs = Attrs::new();

    host.visit("https://example.com/articles?page=2");
    let (mut page, scroller) = mount(&host);
    page.on_push_history();
    let outcome = pollster::block_on(page.on_init(&attrs))?;
    println!("   {outcome:?}, key {}", page.cache_key());

    scroller.offset.set(ScrollPosition::new(0.0, 640.0));
    page.handle_history(HistoryEvent::Changed)?;
    page.handle_history(HistoryEvent::Pushed)?;
    page.on_remove();

    host.visit("https://example.com/articles/42");
    host.visit("https://example.com/articles?page=2");
    let (mut back, _scroller) = mount(&host);
    back.on_pop_history();
    let outcome = pollster::block_on(back.on_init(&attrs))?;
    println!(
        "   {outcome:?}, articles {}",
        back.controller()
            .view_model()
            .and_then(|vm| vm.get("articles"))
            .map_or_else(String::new, ToString::to_string)
    );

    Ok(())
}

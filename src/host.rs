//! Collaborators supplied by the rendering host.
//!
//! The controller state machine never touches a document, a scroll container
//! or a router directly. It asks a [`Host`] for the current location and
//! route params, a [`Scroller`] for scroll reads and writes, and redraw /
//! hard-reload requests go back to the [`Host`]. A non-interactive host (a
//! server render) pairs with [`NoopScroller`] and a
//! [`DisabledStore`](crate::DisabledStore), so the core logic runs unchanged.

use crate::params::Params;
use crate::snapshot::ScrollPosition;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use serde_json::{Map, Value};

/// Read-only attributes bag handed to lifecycle hooks.
pub type Attrs = Map<String, Value>;

/// Current document location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    href: String,
    search: String,
}

impl Location {
    /// Build a location from a full href; `search` is the `?...` part
    /// before any fragment, or empty.
    ///
    /// ```
    /// use navigator_restore::Location;
    ///
    /// let location = Location::new("https://example.com/items?page=2#top");
    /// assert_eq!(location.search(), "?page=2");
    /// assert_eq!(Location::new("/items").search(), "");
    /// ```
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        let without_fragment = href.split('#').next().unwrap_or_default();
        let search = without_fragment
            .find('?')
            .map(|at| without_fragment[at..].to_string())
            .unwrap_or_default();
        Self { href, search }
    }

    /// Build a location with an explicit search component.
    pub fn with_search(href: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            search: search.into(),
        }
    }

    /// Full href.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Search component including the leading `?`, or empty.
    pub fn search(&self) -> &str {
        &self.search
    }
}

/// The surrounding component/rendering runtime.
pub trait Host {
    /// Whether a user-facing document and local storage are available.
    fn is_interactive(&self) -> bool;

    /// Current location; only consulted for cache keys.
    fn location(&self) -> Location;

    /// Client-side route params. Only called in the interactive context.
    fn route_params(&self) -> Params;

    /// Ask the host to re-render.
    fn request_redraw(&self);

    /// Perform a full page reload (hard navigation).
    fn hard_reload(&self);
}

/// Scroll primitives.
pub trait Scroller {
    /// Current scroll offset.
    fn position(&self) -> ScrollPosition;

    /// Jump to `position` immediately.
    fn jump_to(&self, position: ScrollPosition);

    /// Scroll to `position`, resolving once the scroll settles.
    fn animate_to(&self, position: ScrollPosition) -> LocalBoxFuture<'static, ()>;

    /// Resolve at the next paint opportunity.
    fn next_frame(&self) -> LocalBoxFuture<'static, ()>;
}

/// [`Scroller`] for contexts without a viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScroller;

impl Scroller for NoopScroller {
    fn position(&self) -> ScrollPosition {
        ScrollPosition::ORIGIN
    }

    fn jump_to(&self, _position: ScrollPosition) {}

    fn animate_to(&self, _position: ScrollPosition) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_search() {
        assert_eq!(Location::new("https://e.com/?hoge").search(), "?hoge");
        assert_eq!(Location::new("https://e.com/p?a=1&b=2").search(), "?a=1&b=2");
        assert_eq!(Location::new("https://e.com/p#x?y").search(), "");
        assert_eq!(Location::new("https://e.com/p").search(), "");
    }

    #[test]
    fn test_noop_scroller() {
        let scroller = NoopScroller;
        scroller.jump_to(ScrollPosition::new(10.0, 10.0));
        assert_eq!(scroller.position(), ScrollPosition::ORIGIN);
        pollster::block_on(async {
            scroller.next_frame().await;
            scroller.animate_to(ScrollPosition::new(1.0, 2.0)).await;
        });
    }
}

//! View selection for a controller.
//!
//! A controller renders a stack of named views, outermost first. The stack
//! always starts with `"application"`; when the definition declares no views
//! it falls back to the default layout plus a view named after the
//! controller. Rendered fragments may be cached per view name by the host.
//!
//! Raising an error narrows the stack to its layouts plus [`ERROR_VIEW`] and
//! drops every cached fragment.

use std::collections::HashMap;

/// Root view prepended to every selection.
pub const APPLICATION_VIEW: &str = "application";

/// Layout used when a definition declares no views.
pub const DEFAULT_LAYOUT: &str = "layouts/default";

/// View rendered when an error is recorded.
pub const ERROR_VIEW: &str = "error";

const LAYOUT_PREFIX: &str = "layouts/";

/// Ordered view names plus rendered-fragment cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSelection {
    names: Vec<String>,
    fragments: HashMap<String, String>,
}

impl ViewSelection {
    /// Resolve the selection for `controller` from its declared views.
    ///
    /// ```
    /// use navigator_restore::ViewSelection;
    ///
    /// let views = ViewSelection::resolve("mock", &[]);
    /// assert_eq!(views.names(), ["application", "layouts/default", "mock"]);
    ///
    /// let views = ViewSelection::resolve("mock", &["mock".to_string()]);
    /// assert_eq!(views.names(), ["application", "mock"]);
    /// ```
    pub fn resolve(controller: &str, declared: &[String]) -> Self {
        let mut names = Vec::with_capacity(declared.len().max(2) + 1);
        names.push(APPLICATION_VIEW.to_string());
        if declared.is_empty() {
            names.push(DEFAULT_LAYOUT.to_string());
            names.push(controller.to_string());
        } else {
            names.extend(
                declared
                    .iter()
                    .filter(|name| name.as_str() != APPLICATION_VIEW)
                    .cloned(),
            );
        }
        Self {
            names,
            fragments: HashMap::new(),
        }
    }

    /// View names, outermost first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Cached fragment for `view`.
    pub fn fragment(&self, view: &str) -> Option<&str> {
        self.fragments.get(view).map(String::as_str)
    }

    /// Cache a rendered fragment for `view`.
    pub fn cache_fragment(&mut self, view: impl Into<String>, html: impl Into<String>) {
        self.fragments.insert(view.into(), html.into());
    }

    /// Keep only the application root and layouts, then append the error view.
    pub fn narrow_to_error(&mut self) {
        self.fragments.clear();
        self.names
            .retain(|name| name == APPLICATION_VIEW || name.starts_with(LAYOUT_PREFIX));
        self.names.push(ERROR_VIEW.to_string());
    }

    /// Whether the selection currently ends in the error view.
    pub fn is_error(&self) -> bool {
        self.names.last().is_some_and(|name| name == ERROR_VIEW)
    }
}

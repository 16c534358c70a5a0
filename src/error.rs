//! Error types for controller loading and error signaling.
//!
//! - [`ControllerError`] is what load routines, actions and
//!   [`PageController::raise`](crate::PageController::raise) hand back to the
//!   host. None of these are retried; the host decides how to render them.
//! - [`ErrorDescriptor`] is the `{code, message}` record kept by a controller
//!   after an error was raised in the interactive context.
//!
//! Cache problems never surface here. A missing, expired or malformed
//! snapshot is a miss.
//!
//! # Examples
//!
//! ```
//! use navigator_restore::{ControllerError, ErrorDescriptor};
//!
//! let err = ControllerError::raised(404, "Not found");
//! assert_eq!(err.status_code(), Some(404));
//! assert_eq!(err.to_string(), "404: Not found");
//!
//! let descriptor = ErrorDescriptor::new(500, "boom");
//! assert_eq!(descriptor.code, 500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result alias used by load hooks and actions.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Failures produced while driving a controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Raised outside the interactive context; the hosting server turns it
    /// into a transport response carrying `code`.
    #[error("{code}: {message}")]
    Raised { code: u16, message: String },

    /// A registered before/after action failed.
    #[error("action '{name}' failed: {message}")]
    Action { name: String, message: String },

    /// The load hook failed.
    #[error("load failed: {message}")]
    Load { message: String },

    /// The live view-model could not be encoded for capture.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ControllerError {
    /// Build the failure `raise` produces in a non-interactive context.
    pub fn raised(code: u16, message: impl Into<String>) -> Self {
        Self::Raised {
            code,
            message: message.into(),
        }
    }

    /// Build an action failure.
    pub fn action(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Action {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build a load hook failure.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Status code for [`Raised`](Self::Raised) errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Raised { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this is a raised controller error.
    pub fn is_raised(&self) -> bool {
        matches!(self, Self::Raised { .. })
    }
}

/// Error recorded on a controller in the interactive context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Status code, e.g. `404`.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl ErrorDescriptor {
    /// Create a descriptor.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<ErrorDescriptor> for ControllerError {
    fn from(descriptor: ErrorDescriptor) -> Self {
        Self::Raised {
            code: descriptor.code,
            message: descriptor.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raised_display() {
        let error = ControllerError::raised(404, "Not found");
        assert_eq!(error.to_string(), "404: Not found");
        assert!(error.is_raised());
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_action_display() {
        let error = ControllerError::action("fetch", "timeout");
        assert_eq!(error.to_string(), "action 'fetch' failed: timeout");
        assert!(!error.is_raised());
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn test_descriptor_into_error() {
        let error: ControllerError = ErrorDescriptor::new(503, "down").into();
        assert_eq!(error.status_code(), Some(503));
    }

    #[test]
    fn test_serialization_error_from() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ControllerError::from(bad);
        assert!(matches!(error, ControllerError::Serialization(_)));
    }
}

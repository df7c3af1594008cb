//! Error handling for the navigation engine.
//!
//! This module defines the types describing why a navigation attempt did not
//! complete:
//!
//! - [`NavigationResult`] — the top-level outcome of any navigation
//!   (`Completed`, `Unhandled`, `Vetoed`, `Cancelled`, `Redirected`, `Failed`).
//! - [`NavigationError`] — a detailed error variant (invalid template, unknown
//!   route, redirect loop, failed lifecycle hook, etc.).
//!
//! # Examples
//!
//! ```
//! use wayfinder::error::NavigationResult;
//!
//! let result = NavigationResult::Completed { url: "users/1".into() };
//! assert!(result.is_completed());
//!
//! let redirected = NavigationResult::Redirected { to: "login".into() };
//! assert_eq!(redirected.redirect_target(), Some("login"));
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt through the lifecycle pipeline.
///
/// Every call to [`Router::navigate`](crate::router::Router::navigate) (and
/// friends) resolves to this enum.
#[derive(Debug, Clone)]
pub enum NavigationResult {
    /// The route's full lifecycle ran to completion
    Completed { url: String },
    /// No registered route matched the fragment, or the router is stopped
    Unhandled { fragment: String },
    /// A guard returned `false` before the location changed
    Vetoed { fragment: String },
    /// A hook cancelled the attempt and the committed state was restored
    Cancelled { fragment: String },
    /// A hook redirected; the target's lifecycle ran instead
    Redirected { to: String },
    /// A genuine error surfaced from a hook or filter
    Failed(NavigationError),
}

/// Detailed error variants that can occur during navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// A route template could not be compiled
    InvalidPattern { template: String, message: String },

    /// Redirects chained past the depth limit
    RedirectLoop { fragment: String },

    /// A lifecycle hook or filter reported a failure
    HookFailed { stage: String, message: String },

    /// Custom error raised by application code
    Custom { message: String },
}

impl NavigationError {
    /// Build a [`NavigationError::Custom`] from any displayable message.
    pub fn custom(message: impl fmt::Display) -> Self {
        NavigationError::Custom {
            message: message.to_string(),
        }
    }

    /// Build a [`NavigationError::HookFailed`] for the given pipeline stage.
    pub fn hook_failed(stage: &str, message: impl fmt::Display) -> Self {
        NavigationError::HookFailed {
            stage: stage.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::InvalidPattern { template, message } => {
                write!(f, "Invalid route template `{}`: {}", template, message)
            }
            NavigationError::RedirectLoop { fragment } => {
                write!(f, "Redirect loop detected at: {}", fragment)
            }
            NavigationError::HookFailed { stage, message } => {
                write!(f, "Hook failed during {}: {}", stage, message)
            }
            NavigationError::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationResult {
    /// Check if the lifecycle ran to completion
    pub fn is_completed(&self) -> bool {
        matches!(self, NavigationResult::Completed { .. })
    }

    /// Check if no route handled the fragment
    pub fn is_unhandled(&self) -> bool {
        matches!(self, NavigationResult::Unhandled { .. })
    }

    /// Check if a guard vetoed the attempt
    pub fn is_vetoed(&self) -> bool {
        matches!(self, NavigationResult::Vetoed { .. })
    }

    /// Check if a hook cancelled the attempt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationResult::Cancelled { .. })
    }

    /// Check if the attempt was redirected elsewhere
    pub fn is_redirected(&self) -> bool {
        matches!(self, NavigationResult::Redirected { .. })
    }

    /// Check if a genuine error surfaced
    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationResult::Failed(_))
    }

    /// Get the redirect target, if the attempt was redirected
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            NavigationResult::Redirected { to } => Some(to),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_completed() {
        let result = NavigationResult::Completed {
            url: "users/1".to_string(),
        };
        assert!(result.is_completed());
        assert!(!result.is_unhandled());
        assert!(!result.is_vetoed());
        assert!(!result.is_failed());
    }

    #[test]
    fn test_navigation_result_unhandled() {
        let result = NavigationResult::Unhandled {
            fragment: "missing".to_string(),
        };
        assert!(!result.is_completed());
        assert!(result.is_unhandled());
    }

    #[test]
    fn test_navigation_result_redirected() {
        let result = NavigationResult::Redirected {
            to: "login".to_string(),
        };
        assert!(result.is_redirected());
        assert_eq!(result.redirect_target(), Some("login"));
    }

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::hook_failed("prepare", "load failed");
        assert_eq!(error.to_string(), "Hook failed during prepare: load failed");

        let error = NavigationError::RedirectLoop {
            fragment: "loop".to_string(),
        };
        assert_eq!(error.to_string(), "Redirect loop detected at: loop");
    }

    #[test]
    fn test_navigation_error_custom() {
        let error = NavigationError::custom("boom");
        assert_eq!(error.to_string(), "boom");
    }
}

//! History relay contract and the in-memory relay.
//!
//! The engine never touches a location bar directly. Everything it needs
//! from the host environment goes through the [`HistoryRelay`] trait:
//! pattern registration, location updates (push or replace), completion
//! notifications and the current fragment.
//!
//! [`MemoryHistory`] is the bundled in-process relay: a plain fragment stack
//! with push/replace semantics. It backs routers in tests and in hosts
//! without a real location bar.

use std::sync::{Mutex, PoisonError};

/// Options applied to a location update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Dispatch the matching route after updating the location
    pub trigger: bool,
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl NavigateOptions {
    /// Update the location and dispatch the matching route.
    pub fn trigger() -> Self {
        Self {
            trigger: true,
            replace: false,
        }
    }

    /// Replace the current entry without dispatching.
    pub fn replace() -> Self {
        Self {
            trigger: false,
            replace: true,
        }
    }

    /// Set the `trigger` flag.
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the `replace` flag.
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// Host-environment seam for location handling.
///
/// Implementations must be cheap to call; the router invokes the relay from
/// inside the navigation pipeline.
pub trait HistoryRelay: Send + Sync {
    /// A route was registered under the given name and template.
    fn register(&self, name: Option<&str>, template: &str);

    /// Update the location to the given fragment.
    fn navigate(&self, fragment: &str, options: &NavigateOptions);

    /// A navigation completed for the named route.
    fn notify(&self, name: &str, params: &[Option<String>]);

    /// The current location fragment, empty when none.
    fn fragment(&self) -> String;
}

// ============================================================================
// MemoryHistory
// ============================================================================

#[derive(Debug, Default)]
struct MemoryHistoryInner {
    stack: Vec<String>,
    registered: Vec<(Option<String>, String)>,
    notifications: Vec<String>,
}

/// In-process fragment stack implementing [`HistoryRelay`].
///
/// # Example
///
/// ```
/// use wayfinder::history::{HistoryRelay, MemoryHistory, NavigateOptions};
///
/// let history = MemoryHistory::new();
/// history.navigate("users", &NavigateOptions::default());
/// history.navigate("users/1", &NavigateOptions::default());
/// assert_eq!(history.fragment(), "users/1");
///
/// history.navigate("users/2", &NavigateOptions::replace());
/// assert_eq!(history.entries(), vec!["users", "users/2"]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryHistory {
    inner: Mutex<MemoryHistoryInner>,
}

impl MemoryHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryHistoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All fragments currently on the stack, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().stack.clone()
    }

    /// Pop the current fragment, returning the one below it.
    pub fn back(&self) -> Option<String> {
        let mut inner = self.lock();
        inner.stack.pop();
        inner.stack.last().cloned()
    }

    /// Names this relay was notified about, in completion order.
    pub fn notifications(&self) -> Vec<String> {
        self.lock().notifications.clone()
    }

    /// Registered `(name, template)` pairs, in registration order.
    pub fn registered(&self) -> Vec<(Option<String>, String)> {
        self.lock().registered.clone()
    }
}

impl HistoryRelay for MemoryHistory {
    fn register(&self, name: Option<&str>, template: &str) {
        self.lock()
            .registered
            .push((name.map(String::from), template.to_string()));
    }

    fn navigate(&self, fragment: &str, options: &NavigateOptions) {
        let mut inner = self.lock();
        if options.replace {
            inner.stack.pop();
        }
        inner.stack.push(fragment.to_string());
    }

    fn notify(&self, name: &str, _params: &[Option<String>]) {
        self.lock().notifications.push(name.to_string());
    }

    fn fragment(&self) -> String {
        self.lock().stack.last().cloned().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_fragment() {
        let history = MemoryHistory::new();
        assert_eq!(history.fragment(), "");

        history.navigate("a", &NavigateOptions::default());
        history.navigate("b", &NavigateOptions::default());
        assert_eq!(history.fragment(), "b");
        assert_eq!(history.entries(), vec!["a", "b"]);
    }

    #[test]
    fn test_replace_swaps_top_entry() {
        let history = MemoryHistory::new();
        history.navigate("a", &NavigateOptions::default());
        history.navigate("b", &NavigateOptions::default());
        history.navigate("c", &NavigateOptions::replace());
        assert_eq!(history.entries(), vec!["a", "c"]);
    }

    #[test]
    fn test_back_pops_to_previous() {
        let history = MemoryHistory::new();
        history.navigate("a", &NavigateOptions::default());
        history.navigate("b", &NavigateOptions::default());

        assert_eq!(history.back(), Some("a".to_string()));
        assert_eq!(history.fragment(), "a");
    }

    #[test]
    fn test_registration_and_notifications_recorded() {
        let history = MemoryHistory::new();
        history.register(Some("users"), "users");
        history.notify("users", &[]);

        assert_eq!(
            history.registered(),
            vec![(Some("users".to_string()), "users".to_string())]
        );
        assert_eq!(history.notifications(), vec!["users"]);
    }
}

//! Observer registration for routers and routes.
//!
//! [`Emitter`] is an explicit subscription registry: listeners are attached
//! per event name with [`on`](Emitter::on), detached with
//! [`off`](Emitter::off), and invoked synchronously with the navigation
//! context when the engine reaches the matching lifecycle point.
//!
//! Event names used by the engine:
//!
//! | Event             | Emitted                                               |
//! |-------------------|-------------------------------------------------------|
//! | `before:execute`  | before the lifecycle runs, route then router          |
//! | `enter` / `exit`  | on the arriving / departing route handler             |
//! | `after:execute`   | after the execute hook, route then router             |
//! | `before:cancel` / `after:cancel` | around the cancel restore             |
//! | `route:<name>` / `route` | on completion                                  |
//! | `route:unhandled` | a stopped router received a matching fragment         |
//! | `error`           | an unhandled navigation error                         |

use crate::context::NavigationContext;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Callback invoked with the navigation context of the triggering attempt.
pub type Listener = Arc<dyn Fn(&NavigationContext) + Send + Sync>;

/// Per-event listener registry.
///
/// Subscription takes `&self`; both routers and routes hand out shared
/// references to their emitter.
#[derive(Default)]
pub struct Emitter {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl Emitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener to the given event name.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(&NavigationContext) + Send + Sync + 'static,
    {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Remove every listener attached to the given event name.
    pub fn off(&self, event: &str) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.remove(event);
    }

    /// Invoke every listener attached to the given event name.
    ///
    /// Listeners run synchronously in subscription order. The registry is
    /// snapshotted first, so a listener may subscribe or unsubscribe without
    /// deadlocking.
    pub fn emit(&self, event: &str, ctx: &NavigationContext) {
        let snapshot: Vec<Listener> = {
            let listeners = self
                .listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.get(event).cloned().unwrap_or_default()
        };
        for listener in snapshot {
            listener(ctx);
        }
    }

    /// Return `true` if at least one listener is attached to the event.
    pub fn has_listeners(&self, event: &str) -> bool {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.get(event).is_some_and(|l| !l.is_empty())
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Emitter")
            .field("events", &listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

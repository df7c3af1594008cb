//! Route handlers and their lifecycle hooks.
//!
//! A [`Route`] bundles everything a destination can contribute to a
//! navigation: an optional guard, the `prepare` / `execute` / `exit` hooks,
//! an error hook, activation callbacks, an owned filter list and an event
//! emitter. Routes are built with a fluent builder and registered behind an
//! [`Arc`], so a single route instance can back several templates.
//!
//! [`Handler`] is the closed set of things a template can dispatch to:
//! a full [`Route`], a bare async callback, or the name of a router method.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::{Route, HookResult};
//!
//! let route = Route::new()
//!     .on_prepare(|ctx| async move {
//!         if ctx.parameters.get("id").is_none() {
//!             return HookResult::redirect("users");
//!         }
//!         HookResult::Continue
//!     })
//!     .on_execute(|_ctx| async { HookResult::Continue });
//! ```

use crate::context::NavigationContext;
use crate::events::Emitter;
use crate::filter::Filter;
use crate::hooks::{hook, ActivateFn, ErrorDisposition, ErrorFn, GuardFn, HookFn, HookResult};
use crate::hooks::HookFuture;
use crate::history::NavigateOptions;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

// ============================================================================
// Route
// ============================================================================

/// A navigation destination with its lifecycle hooks.
#[derive(Default)]
pub struct Route {
    options: RouteConfig,
    guard: Option<GuardFn>,
    prepare: Option<HookFn>,
    execute: Option<HookFn>,
    exit: Option<HookFn>,
    error: Option<ErrorFn>,
    activate: Option<ActivateFn>,
    deactivate: Option<ActivateFn>,
    filters: Mutex<Vec<Filter>>,
    events: Emitter,
}

impl Route {
    /// Create a route with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a route carrying a configuration map.
    pub fn with_options(options: RouteConfig) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Configuration map this route was built from.
    pub fn options(&self) -> &RouteConfig {
        &self.options
    }

    /// Set the guard consulted before the location changes.
    ///
    /// Returning `false` vetoes the whole navigation.
    pub fn can_navigate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &NavigateOptions) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(f));
        self
    }

    /// Set the `prepare` hook, awaited before `execute`.
    pub fn on_prepare<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.prepare = Some(hook(f));
        self
    }

    /// Set the `execute` hook, the committed stage of the lifecycle.
    pub fn on_execute<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.execute = Some(hook(f));
        self
    }

    /// Set the `exit` hook, awaited when this route is being left.
    pub fn on_exit<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.exit = Some(hook(f));
        self
    }

    /// Set the error hook consulted after a failed attempt was cancelled.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&NavigationContext, &crate::error::NavigationError) -> ErrorDisposition
            + Send
            + Sync
            + 'static,
    {
        self.error = Some(Arc::new(f));
        self
    }

    /// Set the activation callback run on the `enter` event.
    pub fn on_activate<F>(mut self, f: F) -> Self
    where
        F: Fn(&NavigationContext) + Send + Sync + 'static,
    {
        self.activate = Some(Arc::new(f));
        self
    }

    /// Set the deactivation callback run on the `exit` event.
    pub fn on_deactivate<F>(mut self, f: F) -> Self
    where
        F: Fn(&NavigationContext) + Send + Sync + 'static,
    {
        self.deactivate = Some(Arc::new(f));
        self
    }

    /// Append a filter to the end of this route's chain.
    ///
    /// Usable after registration; empty filters are dropped.
    pub fn append_filter(&self, filter: Filter) -> &Self {
        if !filter.is_empty() {
            self.filters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(filter);
        }
        self
    }

    /// Insert a filter at the front of this route's chain.
    pub fn prepend_filter(&self, filter: Filter) -> &Self {
        if !filter.is_empty() {
            self.filters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(0, filter);
        }
        self
    }

    /// Snapshot the current filter chain.
    pub fn filters(&self) -> Vec<Filter> {
        self.filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event emitter for this route.
    pub fn events(&self) -> &Emitter {
        &self.events
    }

    /// Build the redirect marker hooks return to switch destinations.
    pub fn redirect(fragment: impl Into<String>) -> HookResult {
        HookResult::Redirect(fragment.into())
    }

    pub(crate) fn guard_allows(&self, fragment: &str, options: &NavigateOptions) -> bool {
        match &self.guard {
            Some(guard) => guard(fragment, options),
            None => true,
        }
    }

    pub(crate) fn run_prepare(&self, ctx: NavigationContext) -> Option<HookFuture> {
        self.prepare.as_ref().map(|h| h(ctx))
    }

    pub(crate) fn run_execute(&self, ctx: NavigationContext) -> Option<HookFuture> {
        self.execute.as_ref().map(|h| h(ctx))
    }

    pub(crate) fn run_exit(&self, ctx: NavigationContext) -> Option<HookFuture> {
        self.exit.as_ref().map(|h| h(ctx))
    }

    pub(crate) fn run_error(
        &self,
        ctx: &NavigationContext,
        error: &crate::error::NavigationError,
    ) -> ErrorDisposition {
        match &self.error {
            Some(hook) => hook(ctx, error),
            None => ErrorDisposition::Unhandled,
        }
    }

    /// Emit the `enter` event: activation callback first, then subscribers.
    pub fn emit_enter(&self, ctx: &NavigationContext) {
        if let Some(activate) = &self.activate {
            activate(ctx);
        }
        self.events.emit("enter", ctx);
    }

    /// Emit the `exit` event: deactivation callback first, then subscribers.
    pub fn emit_exit(&self, ctx: &NavigationContext) {
        if let Some(deactivate) = &self.deactivate {
            deactivate(ctx);
        }
        self.events.emit("exit", ctx);
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("guard", &self.guard.is_some())
            .field("prepare", &self.prepare.is_some())
            .field("execute", &self.execute.is_some())
            .field("exit", &self.exit.is_some())
            .field("filters", &self.filters().len())
            .finish()
    }
}

// ============================================================================
// Route configuration
// ============================================================================

/// Plain configuration map for a route.
///
/// Registered config maps are wrapped into a [`Route`] through the router's
/// factory hook, so hosts can substitute their own route construction.
pub type RouteConfig = HashMap<String, String>;

/// Factory turning a plain config map into a full route.
pub type RouteFactory = Arc<dyn Fn(RouteConfig) -> Route + Send + Sync>;

/// Default factory: a hook-less route carrying the config map.
pub fn default_route_factory() -> RouteFactory {
    Arc::new(Route::with_options)
}

// ============================================================================
// Handler
// ============================================================================

/// What a registered template dispatches to.
///
/// Resolved once at registration; the variant set is closed.
#[derive(Clone)]
pub enum Handler {
    /// A full route with lifecycle hooks
    Route(Arc<Route>),
    /// A bare async callback run as the execute stage
    Callback(HookFn),
    /// Name of a method registered on the router
    Method(String),
}

impl Handler {
    /// Build a callback handler from an async closure.
    pub fn callback<F, Fut>(f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Handler::Callback(hook(f))
    }

    /// The underlying route, when this handler is one.
    pub fn as_route(&self) -> Option<&Arc<Route>> {
        match self {
            Handler::Route(route) => Some(route),
            _ => None,
        }
    }

    /// Identity comparison.
    ///
    /// Route and callback handlers compare by allocation, method handlers by
    /// name. Used for the staleness check after `prepare`: a redirect that
    /// committed a different handler makes the original pass a no-op.
    pub fn same(&self, other: &Handler) -> bool {
        match (self, other) {
            (Handler::Route(a), Handler::Route(b)) => Arc::ptr_eq(a, b),
            (Handler::Callback(a), Handler::Callback(b)) => Arc::ptr_eq(a, b),
            (Handler::Method(a), Handler::Method(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Route> for Handler {
    fn from(route: Route) -> Self {
        Handler::Route(Arc::new(route))
    }
}

impl From<Arc<Route>> for Handler {
    fn from(route: Arc<Route>) -> Self {
        Handler::Route(route)
    }
}

impl From<&str> for Handler {
    fn from(method: &str) -> Self {
        Handler::Method(method.to_string())
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Route(route) => f.debug_tuple("Route").field(route).finish(),
            Handler::Callback(_) => f.write_str("Callback"),
            Handler::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPhase;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_route_builder_hooks() {
        let route = Route::new()
            .on_prepare(|_| async { HookResult::Continue })
            .on_execute(|_| async { HookResult::Continue });

        assert!(route.run_prepare(NavigationContext::default()).is_some());
        assert!(route.run_execute(NavigationContext::default()).is_some());
        assert!(route.run_exit(NavigationContext::default()).is_none());
    }

    #[test]
    fn test_guard_defaults_to_allow() {
        let open = Route::new();
        assert!(open.guard_allows("anywhere", &NavigateOptions::default()));

        let closed = Route::new().can_navigate(|_, _| false);
        assert!(!closed.guard_allows("anywhere", &NavigateOptions::default()));
    }

    #[test]
    fn test_filters_attach_after_registration() {
        let route = Arc::new(Route::new());
        route.append_filter(Filter::before(|_| async { HookResult::Continue }).named("second"));
        route.prepend_filter(Filter::before(|_| async { HookResult::Continue }).named("first"));
        route.append_filter(Filter::new()); // empty, dropped

        let filters = route.filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].name(), Some("first"));
        assert_eq!(filters[1].name(), Some("second"));
        assert!(filters[0].stage(FilterPhase::Before).is_some());
    }

    #[test]
    fn test_activation_callbacks_run_on_events() {
        let entered = Arc::new(AtomicBool::new(false));
        let flag = entered.clone();
        let route = Route::new().on_activate(move |_| flag.store(true, Ordering::SeqCst));

        route.emit_enter(&NavigationContext::default());
        assert!(entered.load(Ordering::SeqCst));
    }

    #[test]
    fn test_handler_identity() {
        let route = Arc::new(Route::new());
        let a = Handler::Route(route.clone());
        let b = Handler::Route(route);
        let c = Handler::from(Route::new());

        assert!(a.same(&b));
        assert!(!a.same(&c));
        assert!(Handler::Method("show".into()).same(&Handler::from("show")));
        assert!(!a.same(&Handler::from("show")));
    }

    #[test]
    fn test_error_hook_default_is_unhandled() {
        let route = Route::new();
        let err = crate::error::NavigationError::custom("boom");
        assert_eq!(
            route.run_error(&NavigationContext::default(), &err),
            ErrorDisposition::Unhandled
        );
    }

    #[test]
    fn test_default_factory_keeps_options() {
        let mut config = RouteConfig::new();
        config.insert("layout".to_string(), "wide".to_string());
        let route = default_route_factory()(config);
        assert_eq!(route.options().get("layout"), Some(&"wide".to_string()));
    }
}

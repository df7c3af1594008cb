//! The navigation lifecycle controller.
//!
//! [`Router`] owns the route table, the router-level filter chain, the
//! committed `current` / `previous` snapshots and the history relay. A
//! navigation moves through the states:
//!
//! 1. **Guarding** — the router guard, then the previous and current route
//!    guards; any `false` vetoes the attempt before the location changes.
//! 2. **Dispatching** — the location is updated, the first matching registry
//!    entry is selected and the attempt commits: `previous` becomes the old
//!    `current`, `current` the new snapshot, before any hook runs.
//! 3. **Exiting** — the previous route's `exit` hook.
//! 4. **BeforeFilters** — router filters, then route filters, sequentially.
//! 5. **Preparing** — the route's `prepare` hook.
//! 6. **Executing** — the route's `execute` hook; from here on the
//!    navigation is committed and failures no longer restore the previous
//!    state.
//! 7. **Completion** — `route:<name>`, `route`, relay notification, then
//!    `after:execute` and the after-filters.
//!
//! Any hook may resolve [`Cancel`](crate::hooks::HookResult::Cancel),
//! [`Redirect`](crate::hooks::HookResult::Redirect) or
//! [`Failure`](crate::hooks::HookResult::Failure); see [`crate::hooks`] for
//! the uniform contract. Redirect chains are bounded by
//! [`MAX_REDIRECT_DEPTH`].
//!
//! All async methods take `&mut self`, so one router runs one logical
//! navigation at a time; hooks interleave only at their `await` points.

use crate::context::{NavigationContext, NavigationState};
use crate::error::{NavigationError, NavigationResult};
use crate::events::Emitter;
use crate::filter::{run_filters, Filter, FilterPhase, FilterRegistry};
use crate::history::{HistoryRelay, MemoryHistory, NavigateOptions};
use crate::hooks::{ErrorDisposition, GuardFn, HookResult};
use crate::params::RouteParams;
use crate::pattern::{build_url, compose_root, deserialize_params, RoutePattern, UrlParams, BUCKET_KEY};
use crate::registry::{derive_name, RouteEntry, RouteRegistry};
use crate::route::{default_route_factory, Handler, RouteConfig, RouteFactory, Route};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum redirect chain length before the attempt fails.
pub const MAX_REDIRECT_DEPTH: usize = 5;

/// Synchronous router method dispatched by name.
pub type MethodFn = Arc<dyn Fn(&[Option<String>]) + Send + Sync>;

// ============================================================================
// Router options
// ============================================================================

/// Configuration for a [`Router`].
#[derive(Clone)]
pub struct RouterOptions {
    /// Root prefix applied to every built URL
    pub root: String,
    /// Template prefix prepended at registration
    pub path: Option<String>,
    /// Default parameters filled into every navigation
    pub defaults: RouteParams,
    /// Register templates with the history relay
    pub history: bool,
    /// Named filter hooks routes can reference
    pub filters: FilterRegistry,
    route_factory: RouteFactory,
    guard: Option<GuardFn>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            root: String::new(),
            path: None,
            defaults: RouteParams::new(),
            history: true,
            filters: FilterRegistry::new(),
            route_factory: default_route_factory(),
            guard: None,
        }
    }
}

impl RouterOptions {
    /// Create options with defaults: no root, no prefix, history on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root prefix.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the template prefix.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the default parameters.
    pub fn with_defaults(mut self, defaults: RouteParams) -> Self {
        self.defaults = defaults;
        self
    }

    /// Enable or disable history relay registration.
    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }

    /// Set the named filter registry.
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    /// Set the factory wrapping plain config maps into routes.
    pub fn with_route_factory(mut self, factory: RouteFactory) -> Self {
        self.route_factory = factory;
        self
    }

    /// Set the router-level navigation guard.
    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&str, &NavigateOptions) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }
}

impl std::fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterOptions")
            .field("root", &self.root)
            .field("path", &self.path)
            .field("history", &self.history)
            .field("guard", &self.guard.is_some())
            .finish()
    }
}

/// One route in an [`add_routes`](Router::add_routes) batch.
pub struct RouteSpec {
    /// Route name; empty names are skipped with a warning
    pub name: String,
    /// Template text
    pub path: String,
    /// Dispatch target
    pub handler: Handler,
}

// ============================================================================
// Router
// ============================================================================

/// Registers routes and drives the navigation lifecycle.
pub struct Router {
    options: RouterOptions,
    registry: RouteRegistry,
    filters: Vec<Filter>,
    methods: HashMap<String, MethodFn>,
    events: Emitter,
    history: Arc<dyn HistoryRelay>,
    current: Option<NavigationState>,
    previous: Option<NavigationState>,
    stopped: bool,
    #[cfg(feature = "cache")]
    cache: crate::cache::DispatchCache,
}

impl Router {
    /// Create a router backed by an in-memory history relay.
    pub fn new(options: RouterOptions) -> Self {
        Self::with_history(options, Arc::new(MemoryHistory::new()))
    }

    /// Create a router on an explicit history relay.
    pub fn with_history(options: RouterOptions, history: Arc<dyn HistoryRelay>) -> Self {
        Self {
            options,
            registry: RouteRegistry::new(),
            filters: Vec::new(),
            methods: HashMap::new(),
            events: Emitter::new(),
            history,
            current: None,
            previous: None,
            stopped: false,
            #[cfg(feature = "cache")]
            cache: crate::cache::DispatchCache::new(),
        }
    }

    /// This router's configuration.
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// The route table.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// The history relay.
    pub fn history(&self) -> &Arc<dyn HistoryRelay> {
        &self.history
    }

    /// The router's event emitter.
    pub fn events(&self) -> &Emitter {
        &self.events
    }

    /// Attach a listener to a router event.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(&NavigationContext) + Send + Sync + 'static,
    {
        self.events.on(event, listener);
    }

    /// Remove all listeners from a router event.
    pub fn off(&self, event: &str) {
        self.events.off(event);
    }

    /// Resume dispatching after [`stop`](Self::stop).
    pub fn start(&mut self) {
        self.stopped = false;
    }

    /// Stop dispatching.
    ///
    /// A stopped router still lets the location update, but a matching
    /// fragment only emits `route:unhandled`; the committed state is left
    /// untouched.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// `true` while dispatching is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a named method dispatchable via [`Handler::Method`].
    pub fn register_method<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Option<String>]) + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
    }

    /// Append a filter to the router-level chain.
    pub fn append_filter(&mut self, filter: Filter) -> &mut Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Insert a filter at the front of the router-level chain.
    pub fn prepend_filter(&mut self, filter: Filter) -> &mut Self {
        if !filter.is_empty() {
            self.filters.insert(0, filter);
        }
        self
    }

    /// Register a template under a name derived from it.
    ///
    /// `show/all` registers as `show-all`, `user/:id` as `user-id`.
    pub fn route(
        &mut self,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Self, NavigationError> {
        let name = derive_name(template);
        self.register_entry(Some(name), template, handler.into())
    }

    /// Register a template under an explicit name.
    pub fn route_named(
        &mut self,
        name: &str,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Self, NavigationError> {
        self.register_entry(Some(name.to_string()), template, handler.into())
    }

    /// Register a plain config map, wrapped through the route factory.
    pub fn route_config(
        &mut self,
        name: &str,
        template: &str,
        config: RouteConfig,
    ) -> Result<&mut Self, NavigationError> {
        let route = (self.options.route_factory.clone())(config);
        self.route_named(name, template, route)
    }

    /// Register a batch of routes.
    ///
    /// Specs with an empty name are skipped with a warning; the rest are
    /// registered in order.
    pub fn add_routes(&mut self, routes: Vec<RouteSpec>) -> Result<&mut Self, NavigationError> {
        for spec in routes {
            if spec.name.is_empty() {
                crate::warn_log!("Skipping route with empty name for `{}`", spec.path);
                continue;
            }
            self.route_named(&spec.name, &spec.path, spec.handler)?;
        }
        Ok(self)
    }

    fn register_entry(
        &mut self,
        name: Option<String>,
        template: &str,
        handler: Handler,
    ) -> Result<&mut Self, NavigationError> {
        let template = self.prefixed(template);
        let pattern = RoutePattern::compile(&template)?;
        crate::info_log!(
            "Registered route `{}` -> `{}`",
            name.as_deref().unwrap_or("<unnamed>"),
            template
        );
        if self.options.history {
            self.history.register(name.as_deref(), &template);
        }
        self.registry.add(RouteEntry {
            name,
            template: Some(template),
            pattern,
            handler,
        });
        Ok(self)
    }

    fn prefixed(&self, template: &str) -> String {
        match &self.options.path {
            Some(path) if template.is_empty() => path.clone(),
            Some(path) => format!("{}/{}", path, template),
            None => template.to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Build the URL for a named route.
    ///
    /// Router defaults fill parameters not given explicitly. An unknown name
    /// yields the root prefix alone; URL building never fails.
    pub fn url_for(&self, name: &str, params: &RouteParams) -> String {
        let root = &self.options.root;
        match self.registry.template_of(name) {
            Some(template) => {
                let mut params = params.clone();
                params.apply_defaults(&self.options.defaults);
                let url = build_url(template, &UrlParams::Named(params));
                compose_root(root, &url)
            }
            None => {
                crate::warn_log!("Unknown route `{}`; returning root", name);
                root.clone()
            }
        }
    }

    /// Template registered under a name.
    pub fn template_of(&self, name: &str) -> Option<&str> {
        self.registry.template_of(name)
    }

    /// Handler registered under a name.
    pub fn handler_of(&self, name: &str) -> Option<&Handler> {
        self.registry.handler_of(name)
    }

    /// The committed navigation, if any.
    pub fn current(&self) -> Option<&NavigationState> {
        self.current.as_ref()
    }

    /// The navigation committed before the current one.
    pub fn previous(&self) -> Option<&NavigationState> {
        self.previous.as_ref()
    }

    /// URL of the committed navigation, empty when none.
    pub fn current_url(&self) -> String {
        self.current
            .as_ref()
            .map(|c| c.url.clone())
            .unwrap_or_default()
    }

    /// Exact comparison against the committed URL.
    ///
    /// With no committed navigation only the empty URL matches.
    pub fn matches_url(&self, url: &str) -> bool {
        match &self.current {
            Some(current) => current.url == url,
            None => url.is_empty(),
        }
    }

    /// Exact-match check for a named route with the given parameters.
    pub fn matches_route(&self, name: &str, params: &RouteParams) -> bool {
        self.matches_url(&self.url_for(name, params))
    }

    #[cfg(feature = "cache")]
    /// Hit/miss counters of the dispatch cache.
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Navigate to a fragment.
    ///
    /// Guards run first; then the location updates through the relay. With
    /// `options.trigger` the matching route's lifecycle runs as well.
    pub fn navigate(
        &mut self,
        fragment: &str,
        options: NavigateOptions,
    ) -> BoxFuture<'_, NavigationResult> {
        let fragment = fragment.to_string();
        async move {
            if !self.guards_allow(&fragment, &options) {
                crate::debug_log!("Navigation to `{}` vetoed by guard", fragment);
                return NavigationResult::Vetoed { fragment };
            }
            self.history.navigate(&fragment, &options);
            if !options.trigger {
                return NavigationResult::Completed { url: fragment };
            }
            let local = self.strip_root(&fragment);
            self.dispatch(local, 0).await
        }
        .boxed()
    }

    /// Navigate to a named route.
    pub fn navigate_to(
        &mut self,
        name: &str,
        params: &RouteParams,
        options: NavigateOptions,
    ) -> BoxFuture<'_, NavigationResult> {
        let url = self.url_for(name, params);
        async move { self.navigate(&url, options).await }.boxed()
    }

    /// Run the matching route's lifecycle without touching the location.
    pub fn execute_url(&mut self, fragment: &str) -> BoxFuture<'_, NavigationResult> {
        let local = self.strip_root(fragment);
        self.dispatch(local, 0)
    }

    /// Run a named route's lifecycle without touching the location.
    pub fn execute_route(
        &mut self,
        name: &str,
        params: &RouteParams,
    ) -> BoxFuture<'_, NavigationResult> {
        let url = self.url_for(name, params);
        self.execute_url(&url)
    }

    fn guards_allow(&self, fragment: &str, options: &NavigateOptions) -> bool {
        if let Some(guard) = &self.options.guard {
            if !guard(fragment, options) {
                return false;
            }
        }
        if let Some(prev) = self.previous.as_ref().and_then(|p| p.handler.as_route()) {
            if !prev.guard_allows(fragment, options) {
                return false;
            }
        }
        if let Some(current) = self.current.as_ref().and_then(|c| c.handler.as_route()) {
            if !current.guard_allows(fragment, options) {
                return false;
            }
        }
        true
    }

    fn strip_root(&self, fragment: &str) -> String {
        let root = &self.options.root;
        if root.is_empty() {
            return fragment.to_string();
        }
        if fragment == root {
            return String::new();
        }
        fragment
            .strip_prefix(&format!("{}/", root))
            .map(String::from)
            .unwrap_or_else(|| fragment.to_string())
    }

    // ------------------------------------------------------------------
    // Dispatch pipeline
    // ------------------------------------------------------------------

    fn dispatch(&mut self, fragment: String, depth: usize) -> BoxFuture<'_, NavigationResult> {
        async move {
            if depth > MAX_REDIRECT_DEPTH {
                crate::warn_log!("Redirect depth exceeded at `{}`", fragment);
                return NavigationResult::Failed(NavigationError::RedirectLoop { fragment });
            }

            let Some(index) = self.find_match(&fragment) else {
                crate::debug_log!("No route matched `{}`", fragment);
                return NavigationResult::Unhandled { fragment };
            };
            crate::trace_log!("Fragment `{}` matched registry entry {}", fragment, index);
            let Some(entry) = self.registry.entry(index) else {
                return NavigationResult::Unhandled { fragment };
            };

            let handler = entry.handler.clone();
            let ctx = self.build_context(entry, &fragment);

            if self.stopped {
                crate::info_log!("Router stopped; `{}` left unhandled", fragment);
                self.events.emit("route:unhandled", &ctx);
                return NavigationResult::Unhandled { fragment };
            }

            self.handle_route(ctx, handler, depth).await
        }
        .boxed()
    }

    fn find_match(&mut self, fragment: &str) -> Option<usize> {
        #[cfg(feature = "cache")]
        {
            let generation = self.registry.generation();
            if let Some(index) = self.cache.get(fragment, generation) {
                return Some(index);
            }
            let (index, _) = self.registry.match_fragment(fragment)?;
            self.cache.insert(fragment, index, generation);
            Some(index)
        }
        #[cfg(not(feature = "cache"))]
        {
            self.registry.match_fragment(fragment).map(|(index, _)| index)
        }
    }

    fn build_context(&self, entry: &RouteEntry, fragment: &str) -> NavigationContext {
        let params = entry.pattern.extract(fragment).unwrap_or_default();
        let template = entry.template.clone().unwrap_or_default();

        let mut parameters = self.options.defaults.clone();
        let mut bucket = RouteParams::new();
        for (i, key) in entry.pattern.keys().iter().enumerate() {
            let value = params.get(i).cloned().flatten();
            if key == BUCKET_KEY {
                if let Some(v) = value {
                    bucket = deserialize_params(&v);
                }
            } else if let Some(v) = value {
                parameters.insert(key.clone(), v);
            }
        }
        parameters.apply_defaults(&bucket);

        let url = compose_root(
            &self.options.root,
            &build_url(&template, &UrlParams::Positional(params.clone())),
        );

        NavigationContext {
            name: entry.name.clone().unwrap_or_default(),
            template,
            url,
            root: self.options.root.clone(),
            params,
            parameters,
            error: None,
        }
    }

    async fn handle_route(
        &mut self,
        mut ctx: NavigationContext,
        handler: Handler,
        depth: usize,
    ) -> NavigationResult {
        crate::info_log!("Navigating to `{}` ({})", ctx.name, ctx.url);

        // Commit before any hook runs, so hooks see who is leaving/arriving
        self.previous = self.current.take();
        self.current = Some(NavigationState::snapshot(&ctx, handler.clone()));

        match handler {
            Handler::Method(name) => {
                let Some(method) = self.methods.get(&name).cloned() else {
                    crate::warn_log!("No router method `{}` registered", name);
                    return NavigationResult::Failed(NavigationError::custom(format!(
                        "no router method `{}`",
                        name
                    )));
                };
                method(&ctx.params);
                self.complete(&ctx);
                NavigationResult::Completed { url: ctx.url }
            }
            Handler::Callback(callback) => match callback(ctx.clone()).await {
                HookResult::Continue => {
                    self.complete(&ctx);
                    NavigationResult::Completed { url: ctx.url }
                }
                HookResult::Redirect(to) => self.follow_redirect(to, depth).await,
                HookResult::Cancel => self.cancelled(None, &ctx, "execute", depth).await,
                HookResult::Failure(err) => self.fail(None, &mut ctx, err, depth, true).await,
            },
            Handler::Route(route) => self.run_route(route, ctx, depth).await,
        }
    }

    async fn run_route(
        &mut self,
        route: Arc<Route>,
        mut ctx: NavigationContext,
        depth: usize,
    ) -> NavigationResult {
        let prev_route = self
            .previous
            .as_ref()
            .and_then(|p| p.handler.as_route())
            .cloned();

        route.events().emit("before:execute", &ctx);
        self.events.emit("before:execute", &ctx);

        // Exiting
        if let Some(prev) = &prev_route {
            if let Some(exit) = prev.run_exit(ctx.clone()) {
                match exit.await {
                    HookResult::Continue => {}
                    HookResult::Redirect(to) => return self.follow_redirect(to, depth).await,
                    HookResult::Cancel => {
                        return self.cancelled(Some(&route), &ctx, "exit", depth).await
                    }
                    HookResult::Failure(err) => {
                        return self.fail(Some(&route), &mut ctx, err, depth, true).await
                    }
                }
            }
        }

        // BeforeFilters
        let route_filters = route.filters();
        let before = run_filters(FilterPhase::Before, &self.filters, &route_filters, &ctx).await;
        match before {
            HookResult::Continue => {}
            HookResult::Redirect(to) => return self.follow_redirect(to, depth).await,
            HookResult::Cancel => {
                return self.cancelled(Some(&route), &ctx, "before", depth).await
            }
            HookResult::Failure(err) => {
                return self.fail(Some(&route), &mut ctx, err, depth, true).await
            }
        }

        // Activation events
        if let Some(prev) = &prev_route {
            prev.emit_exit(&ctx);
        }
        route.emit_enter(&ctx);

        // Preparing
        if let Some(prepare) = route.run_prepare(ctx.clone()) {
            match prepare.await {
                HookResult::Continue => {}
                HookResult::Redirect(to) => return self.follow_redirect(to, depth).await,
                HookResult::Cancel => {
                    return self.cancelled(Some(&route), &ctx, "prepare", depth).await
                }
                HookResult::Failure(err) => {
                    return self.fail(Some(&route), &mut ctx, err, depth, true).await
                }
            }
        }

        // A redirect may have committed a different handler; if so, this
        // pass is already superseded
        let this_handler = Handler::Route(route.clone());
        let still_current = self
            .current
            .as_ref()
            .is_some_and(|c| c.handler.same(&this_handler));
        if !still_current {
            crate::debug_log!("Route `{}` superseded before execute", ctx.name);
            return NavigationResult::Redirected {
                to: self.current_url(),
            };
        }

        // Executing: the navigation is committed from here on
        if let Some(execute) = route.run_execute(ctx.clone()) {
            match execute.await {
                HookResult::Continue => {}
                HookResult::Redirect(to) => return self.follow_redirect(to, depth).await,
                HookResult::Cancel => {
                    crate::warn_log!("Execute cancelled `{}`; committed state stays", ctx.name);
                    return NavigationResult::Cancelled { fragment: ctx.url };
                }
                HookResult::Failure(err) => {
                    return self.fail(Some(&route), &mut ctx, err, depth, false).await
                }
            }
        }

        // Completion
        self.complete(&ctx);
        route.events().emit("after:execute", &ctx);
        self.events.emit("after:execute", &ctx);

        // AfterFilters
        let after = run_filters(FilterPhase::After, &self.filters, &route_filters, &ctx).await;
        match after {
            HookResult::Continue => {}
            HookResult::Redirect(to) => return self.follow_redirect(to, depth).await,
            HookResult::Cancel => {
                crate::warn_log!("After-filter cancel ignored for `{}`", ctx.name);
            }
            HookResult::Failure(err) => {
                return self.fail(Some(&route), &mut ctx, err, depth, false).await
            }
        }

        NavigationResult::Completed { url: ctx.url }
    }

    async fn follow_redirect(&mut self, to: String, depth: usize) -> NavigationResult {
        crate::info_log!("Redirecting to `{}`", to);
        let options = NavigateOptions::trigger();
        if !self.guards_allow(&to, &options) {
            return NavigationResult::Vetoed { fragment: to };
        }
        self.history.navigate(&to, &options);
        let local = self.strip_root(&to);
        match self.dispatch(local, depth + 1).await {
            NavigationResult::Failed(err) => NavigationResult::Failed(err),
            _ => NavigationResult::Redirected { to },
        }
    }

    /// Failure path: attach the error, optionally restore the previous
    /// state, then consult the route's error hook.
    async fn fail(
        &mut self,
        route: Option<&Arc<Route>>,
        ctx: &mut NavigationContext,
        err: NavigationError,
        depth: usize,
        revert: bool,
    ) -> NavigationResult {
        crate::error_log!("Navigation to `{}` failed: {}", ctx.name, err);
        ctx.error = Some(err.clone());

        if revert {
            self.cancel(route, ctx);
        }

        let disposition = route
            .map(|r| r.run_error(ctx, &err))
            .unwrap_or(ErrorDisposition::Unhandled);
        match disposition {
            ErrorDisposition::Handled => {
                crate::debug_log!("Error for `{}` handled by route hook", ctx.name);
            }
            ErrorDisposition::Redirect(to) => return self.follow_redirect(to, depth).await,
            ErrorDisposition::Unhandled => self.events.emit("error", ctx),
        }

        NavigationResult::Failed(err)
    }

    /// Explicit-cancel path: revert to the previous committed state, then
    /// consult the route's error hook exactly as a genuine failure would.
    ///
    /// The hook sees a `HookFailed` tagged with the cancelling stage;
    /// `Handled` suppresses the router `error` event, `Redirect` navigates.
    async fn cancelled(
        &mut self,
        route: Option<&Arc<Route>>,
        ctx: &NavigationContext,
        stage: &str,
        depth: usize,
    ) -> NavigationResult {
        self.cancel(route, ctx);

        let err = NavigationError::hook_failed(stage, "navigation cancelled");
        let disposition = route
            .map(|r| r.run_error(ctx, &err))
            .unwrap_or(ErrorDisposition::Unhandled);
        match disposition {
            ErrorDisposition::Handled => {
                crate::debug_log!("Cancel of `{}` handled by route hook", ctx.name);
            }
            ErrorDisposition::Redirect(to) => return self.follow_redirect(to, depth).await,
            ErrorDisposition::Unhandled => self.events.emit("error", ctx),
        }

        NavigationResult::Cancelled {
            fragment: ctx.url.clone(),
        }
    }

    fn cancel(&mut self, route: Option<&Arc<Route>>, ctx: &NavigationContext) {
        crate::debug_log!("Cancelling navigation to `{}`", ctx.name);
        if let Some(r) = route {
            r.events().emit("before:cancel", ctx);
        }
        self.events.emit("before:cancel", ctx);

        self.current = self.previous.clone();
        let previous_url = self
            .current
            .as_ref()
            .map(|c| c.url.clone())
            .unwrap_or_default();
        self.history.navigate(&previous_url, &NavigateOptions::replace());

        if let Some(r) = route {
            r.events().emit("after:cancel", ctx);
        }
        self.events.emit("after:cancel", ctx);
    }

    fn complete(&self, ctx: &NavigationContext) {
        crate::info_log!("Navigation completed: `{}`", ctx.url);
        self.events.emit(&format!("route:{}", ctx.name), ctx);
        self.events.emit("route", ctx);
        self.history.notify(&ctx.name, &ctx.params);
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("routes", &self.registry.len())
            .field("current", &self.current.as_ref().map(|c| &c.url))
            .field("stopped", &self.stopped)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    fn noop_route() -> Route {
        Route::new().on_execute(|_| async { HookResult::Continue })
    }

    #[test]
    fn test_route_registers_with_derived_name() {
        let mut router = Router::new(RouterOptions::new());
        router.route("users/:id", noop_route()).unwrap();

        assert_eq!(router.template_of("users-id"), Some("users/:id"));
        assert!(router.handler_of("users-id").is_some());
    }

    #[test]
    fn test_path_prefix_applied_at_registration() {
        let options = RouterOptions::new().with_path("admin");
        let mut router = Router::new(options);
        router.route_named("panel", "panel", noop_route()).unwrap();
        router.route_named("home", "", noop_route()).unwrap();

        assert_eq!(router.template_of("panel"), Some("admin/panel"));
        assert_eq!(router.template_of("home"), Some("admin"));
    }

    #[test]
    fn test_url_for_unknown_name_yields_root() {
        let router = Router::new(RouterOptions::new().with_root("app"));
        assert_eq!(router.url_for("missing", &RouteParams::new()), "app");
    }

    #[test]
    fn test_url_for_applies_defaults() {
        let mut defaults = RouteParams::new();
        defaults.set("mode".to_string(), "view".to_string());
        let mut router = Router::new(RouterOptions::new().with_defaults(defaults));
        router
            .route_named("doc", "docs/:id/:mode", noop_route())
            .unwrap();

        let mut params = RouteParams::new();
        params.set("id".to_string(), "9".to_string());
        assert_eq!(router.url_for("doc", &params), "docs/9/view");
    }

    #[test]
    fn test_navigate_commits_current() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users", "users", noop_route()).unwrap();

        let result = block_on(router.navigate("users", NavigateOptions::trigger()));
        assert!(result.is_completed());

        let current = router.current().unwrap();
        assert_eq!(current.name, "users");
        assert_eq!(current.url, "users");
        assert!(router.matches_url("users"));
        assert!(router.matches_route("users", &RouteParams::new()));
    }

    #[test]
    fn test_navigate_without_trigger_skips_dispatch() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users", "users", noop_route()).unwrap();

        let result = block_on(router.navigate("users", NavigateOptions::default()));
        assert!(result.is_completed());
        assert!(router.current().is_none());
        assert_eq!(router.history().fragment(), "users");
    }

    #[test]
    fn test_unmatched_fragment_is_unhandled() {
        let mut router = Router::new(RouterOptions::new());
        let result = block_on(router.navigate("nowhere", NavigateOptions::trigger()));
        assert!(result.is_unhandled());
    }

    #[test]
    fn test_router_guard_vetoes_before_location_change() {
        let options = RouterOptions::new().with_guard(|fragment, _| fragment != "private");
        let mut router = Router::new(options);
        router.route_named("private", "private", noop_route()).unwrap();

        let result = block_on(router.navigate("private", NavigateOptions::trigger()));
        assert!(result.is_vetoed());
        assert_eq!(router.history().fragment(), "");
        assert!(router.current().is_none());
    }

    #[test]
    fn test_dispatch_extracts_parameters() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users.show", "users/:id", noop_route()).unwrap();

        block_on(router.execute_url("users/42"));
        let current = router.current().unwrap();
        assert_eq!(current.parameters.get("id"), Some(&"42".to_string()));
        assert_eq!(current.params, vec![Some("42".to_string())]);
    }

    #[test]
    fn test_bucket_segment_deserialized_into_parameters() {
        let mut router = Router::new(RouterOptions::new());
        router
            .route_named("search", "search(/*params)", noop_route())
            .unwrap();

        block_on(router.execute_url("search/page:2+q:rust"));
        let current = router.current().unwrap();
        assert_eq!(current.parameters.get("page"), Some(&"2".to_string()));
        assert_eq!(current.parameters.get("q"), Some(&"rust".to_string()));
    }

    #[test]
    fn test_method_handler_dispatch() {
        let called = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut router = Router::new(RouterOptions::new());
        let log = called.clone();
        router.register_method("show_user", move |params| {
            log.lock().unwrap().push(params.first().cloned().flatten());
        });
        router
            .route_named("users.show", "users/:id", Handler::from("show_user"))
            .unwrap();

        let result = block_on(router.execute_url("users/7"));
        assert!(result.is_completed());
        assert_eq!(*called.lock().unwrap(), vec![Some("7".to_string())]);
    }

    #[test]
    fn test_stopped_router_leaves_state_untouched() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users", "users", noop_route()).unwrap();
        router.route_named("posts", "posts", noop_route()).unwrap();

        block_on(router.navigate("users", NavigateOptions::trigger()));
        router.stop();

        let unhandled = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = unhandled.clone();
        router.on("route:unhandled", move |_| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        let result = block_on(router.navigate("posts", NavigateOptions::trigger()));
        assert!(result.is_unhandled());
        assert!(unhandled.load(std::sync::atomic::Ordering::SeqCst));
        // Location updated, committed state did not
        assert_eq!(router.history().fragment(), "posts");
        assert_eq!(router.current().unwrap().url, "users");

        router.start();
        let result = block_on(router.navigate("posts", NavigateOptions::trigger()));
        assert!(result.is_completed());
        assert_eq!(router.current().unwrap().url, "posts");
    }

    #[test]
    fn test_root_stripped_before_matching() {
        let mut router = Router::new(RouterOptions::new().with_root("app"));
        router.route_named("users", "users", noop_route()).unwrap();

        let result = block_on(router.navigate("app/users", NavigateOptions::trigger()));
        assert!(result.is_completed());
        assert_eq!(router.current().unwrap().url, "app/users");
    }

    #[test]
    fn test_navigate_to_builds_url_from_name() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users.show", "users/:id", noop_route()).unwrap();

        let mut params = RouteParams::new();
        params.set("id".to_string(), "3".to_string());
        let result = block_on(router.navigate_to(
            "users.show",
            &params,
            NavigateOptions::trigger(),
        ));
        assert!(result.is_completed());
        assert_eq!(router.current().unwrap().url, "users/3");
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_dispatch_cache_hits_on_repeat() {
        let mut router = Router::new(RouterOptions::new());
        router.route_named("users", "users", noop_route()).unwrap();

        block_on(router.execute_url("users"));
        block_on(router.execute_url("users"));
        assert!(router.cache_stats().hits >= 1);
    }
}

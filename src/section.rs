//! Nested sub-routers mounted under a URL subtree.
//!
//! A section claims everything under a root segment with the template
//! `root(/*path)` and forwards the captured remainder to its own
//! history-less router. Sub-routes register against the section router and
//! build fully qualified URLs through its `root` option, while the parent
//! router sees the whole subtree as a single route.
//!
//! The sub-router lives behind an async mutex: the parent's `execute` hook
//! locks it only for the duration of the forwarded dispatch.

use crate::context::NavigationContext;
use crate::error::{NavigationError, NavigationResult};
use crate::hooks::HookResult;
use crate::route::{Handler, Route};
use crate::router::{Router, RouterOptions};
use futures::lock::Mutex;
use std::sync::Arc;

/// Parameter key the section template captures the remainder under.
const PATH_KEY: &str = "path";

/// A subtree of routes owned by a nested router.
#[derive(Clone)]
pub struct Section {
    router: Arc<Mutex<Router>>,
    root: String,
}

impl Section {
    fn new(root: &str, options: RouterOptions) -> Self {
        let options = options.with_root(root).with_history(false);
        Self {
            router: Arc::new(Mutex::new(Router::new(options))),
            root: root.to_string(),
        }
    }

    /// Root segment this section is mounted under.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Shared handle to the nested router.
    pub fn router(&self) -> Arc<Mutex<Router>> {
        self.router.clone()
    }

    /// Register a template on the nested router under a derived name.
    pub async fn route(
        &self,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<(), NavigationError> {
        self.router.lock().await.route(template, handler)?;
        Ok(())
    }

    /// Register a template on the nested router under an explicit name.
    pub async fn route_named(
        &self,
        name: &str,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<(), NavigationError> {
        self.router.lock().await.route_named(name, template, handler)?;
        Ok(())
    }

    /// Build the parent-side route that forwards into this section.
    fn into_route(self) -> Route {
        let exec = self.router.clone();
        let enter = self.router.clone();
        let exit = self.router.clone();

        Route::new()
            .on_execute(move |ctx: NavigationContext| {
                let router = exec.clone();
                async move {
                    let path = ctx
                        .parameters
                        .get(PATH_KEY)
                        .cloned()
                        .unwrap_or_default();
                    let mut router = router.lock().await;
                    match router.execute_url(&path).await {
                        NavigationResult::Failed(err) => HookResult::Failure(err),
                        _ => HookResult::Continue,
                    }
                }
            })
            .on_activate(move |ctx| forward_activation(&enter, ctx, true))
            .on_deactivate(move |ctx| forward_activation(&exit, ctx, false))
    }
}

impl std::fmt::Debug for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Section").field("root", &self.root).finish()
    }
}

/// Pass an enter/exit event on to the sub-router's committed handler.
///
/// Activation callbacks are synchronous; the sub-router is uncontended at
/// these points, so a failed lock just drops the forwarded event.
fn forward_activation(router: &Arc<Mutex<Router>>, ctx: &NavigationContext, entering: bool) {
    if let Some(router) = router.try_lock() {
        if let Some(route) = router.current().and_then(|c| c.handler.as_route()) {
            if entering {
                route.emit_enter(ctx);
            } else {
                route.emit_exit(ctx);
            }
        }
    }
}

impl Router {
    /// Mount a [`Section`] under the given root segment.
    ///
    /// Registers `root(/*path)` on this router under `name`; the returned
    /// section accepts sub-route registrations and exposes its router for
    /// queries.
    pub fn section(
        &mut self,
        name: &str,
        root: &str,
        options: RouterOptions,
    ) -> Result<Section, NavigationError> {
        let section = Section::new(root, options);
        let template = format!("{}(/*{})", root, PATH_KEY);
        self.route_named(name, &template, section.clone().into_route())?;
        Ok(section)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Before/after navigation filters.
//!
//! A [`Filter`] pairs an optional before-hook with an optional after-hook.
//! Routers and routes each keep an ordered filter list; during a navigation
//! the router's filters run first, then the route's, strictly sequentially —
//! hook N+1 starts only after hook N's future settled. The first
//! non-[`Continue`](crate::hooks::HookResult::Continue) result
//! short-circuits the rest of the pipeline.
//!
//! Filters can also be registered once by name in a [`FilterRegistry`]
//! (carried by [`RouterOptions`](crate::router::RouterOptions)) and attached
//! to routes by that name.

use crate::context::NavigationContext;
use crate::hooks::{hook, HookFn, HookResult};
use std::collections::HashMap;
use std::future::Future;

/// Which side of the lifecycle a filter hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    /// Before the route's `prepare` hook
    Before,
    /// After the route's `execute` hook
    After,
}

/// An ordered pair of optional navigation hooks.
#[derive(Clone, Default)]
pub struct Filter {
    name: Option<String>,
    before: Option<HookFn>,
    after: Option<HookFn>,
}

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter with only a before-hook.
    pub fn before<F, Fut>(f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Self {
            before: Some(hook(f)),
            ..Self::default()
        }
    }

    /// Build a filter with only an after-hook.
    pub fn after<F, Fut>(f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Self {
            after: Some(hook(f)),
            ..Self::default()
        }
    }

    /// Add a before-hook to this filter.
    pub fn with_before<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.before = Some(hook(f));
        self
    }

    /// Add an after-hook to this filter.
    pub fn with_after<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.after = Some(hook(f));
        self
    }

    /// Tag this filter with a diagnostic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Diagnostic name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The hook for the given phase, if present.
    pub fn stage(&self, phase: FilterPhase) -> Option<&HookFn> {
        match phase {
            FilterPhase::Before => self.before.as_ref(),
            FilterPhase::After => self.after.as_ref(),
        }
    }

    /// `true` when neither hook is present.
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

// ============================================================================
// Named filter registry
// ============================================================================

/// Shared hooks registered once and referenced from routes by name.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    hooks: HashMap<String, HookFn>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under the given name, replacing any previous one.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.hooks.insert(name.into(), hook(f));
    }

    /// Look up a registered hook.
    pub fn get(&self, name: &str) -> Option<&HookFn> {
        self.hooks.get(name)
    }

    /// Build a [`Filter`] from registered hook names.
    ///
    /// Unknown names resolve to no hook on that side; the filter is tagged
    /// with the before-name (or after-name) for diagnostics.
    pub fn filter(&self, before: Option<&str>, after: Option<&str>) -> Filter {
        Filter {
            name: before.or(after).map(String::from),
            before: before.and_then(|n| self.get(n)).cloned(),
            after: after.and_then(|n| self.get(n)).cloned(),
        }
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Sequential execution
// ============================================================================

/// Run one phase of a filter chain, strictly in order.
///
/// Router filters come before route filters; filters lacking a hook for the
/// phase are skipped. The first non-`Continue` result stops the chain and is
/// returned. An empty chain resolves to `Continue` immediately.
pub async fn run_filters(
    phase: FilterPhase,
    router_filters: &[Filter],
    route_filters: &[Filter],
    ctx: &NavigationContext,
) -> HookResult {
    for filter in router_filters.iter().chain(route_filters.iter()) {
        if let Some(stage) = filter.stage(phase) {
            let result = stage(ctx.clone()).await;
            if !result.is_continue() {
                crate::debug_log!(
                    "Filter {:?} settled {:?} during {:?}",
                    filter.name().unwrap_or("<anonymous>"),
                    result,
                    phase
                );
                return result;
            }
        }
    }
    HookResult::Continue
}

// ============================================================================
// Tests
// ============================================================================

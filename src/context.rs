//! Navigation context and committed state snapshots.
//!
//! A [`NavigationContext`] is created per navigation attempt and threaded
//! through every hook, filter and event listener. It carries the resolved
//! route identity (name, template, URL) alongside both parameter views:
//! positional capture values and the merged named map.
//!
//! A [`NavigationState`] is the immutable snapshot a router commits as its
//! `current` / `previous` record. It is frozen before the lifecycle hooks
//! run, so hooks can observe both who is leaving and who is arriving.

use crate::error::NavigationError;
use crate::params::RouteParams;
use crate::pattern::{build_url, compose_root, UrlParams};
use crate::route::Handler;

/// Per-attempt navigation data handed to hooks, filters and listeners.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    /// Resolved route name (possibly derived from the template)
    pub name: String,
    /// Template text the fragment matched (empty for unnamed matches)
    pub template: String,
    /// Full URL of the attempt, root prefix included
    pub url: String,
    /// Root prefix of the dispatching router
    pub root: String,
    /// Positional capture values in template order
    pub params: Vec<Option<String>>,
    /// Named parameters: defaults, extracted values, then bucket pairs
    pub parameters: RouteParams,
    /// Error attached on the failure path, if any
    pub error: Option<NavigationError>,
}

impl NavigationContext {
    /// Rebuild this context's URL with some parameters overridden.
    ///
    /// The override map wins over the context's own parameters; the router's
    /// root prefix is preserved.
    pub fn url_with(&self, overrides: &RouteParams) -> String {
        let merged = RouteParams::merge(&self.parameters, overrides);
        let url = build_url(&self.template, &UrlParams::Named(merged));
        compose_root(&self.root, &url)
    }
}

/// Committed navigation snapshot.
///
/// Held by the router as `current` and `previous`; both are `None` until the
/// first navigation commits.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Handler this state dispatched to
    pub handler: Handler,
    /// Resolved route name
    pub name: String,
    /// Matched template text
    pub template: String,
    /// Full URL, root prefix included
    pub url: String,
    /// Positional capture values
    pub params: Vec<Option<String>>,
    /// Named parameters at commit time
    pub parameters: RouteParams,
}

impl NavigationState {
    /// Freeze a context into a committed snapshot.
    pub fn snapshot(ctx: &NavigationContext, handler: Handler) -> Self {
        Self {
            handler,
            name: ctx.name.clone(),
            template: ctx.template.clone(),
            url: ctx.url.clone(),
            params: ctx.params.clone(),
            parameters: ctx.parameters.clone(),
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
    fn test_url_with_overrides() {
        let mut parameters = RouteParams::new();
        parameters.set("id".to_string(), "1".to_string());

        let ctx = NavigationContext {
            name: "users.show".to_string(),
            template: "users/:id".to_string(),
            url: "users/1".to_string(),
            parameters,
            ..NavigationContext::default()
        };

        let mut overrides = RouteParams::new();
        overrides.set("id".to_string(), "2".to_string());
        assert_eq!(ctx.url_with(&overrides), "users/2");
        assert_eq!(ctx.url_with(&RouteParams::new()), "users/1");
    }

    #[test]
    fn test_url_with_preserves_root() {
        let mut parameters = RouteParams::new();
        parameters.set("id".to_string(), "1".to_string());

        let ctx = NavigationContext {
            template: "users/:id".to_string(),
            root: "app".to_string(),
            parameters,
            ..NavigationContext::default()
        };
        assert_eq!(ctx.url_with(&RouteParams::new()), "app/users/1");
    }
}

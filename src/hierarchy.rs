//! Hierarchy queries over dot-delimited route names.
//!
//! Route names form an implicit tree: `users.show.documents` sits under
//! `users.show`, which sits under `users`. Nothing is materialized; every
//! query walks the registry on demand, so the answers always reflect the
//! current route table.
//!
//! URLs returned by these queries are built from the query's parameter set
//! and carry no root prefix, making them directly suitable for breadcrumbs
//! and navigation menus.

use crate::params::RouteParams;
use crate::pattern::{build_url, UrlParams};
use crate::router::Router;

/// One route in a hierarchy query result.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    /// Dot-delimited route name
    pub name: String,
    /// Registered template text
    pub template: String,
    /// URL built with the query's parameters
    pub url: String,
    /// `true` for the queried route itself
    pub active: bool,
}

impl Router {
    /// Ancestor chain of the committed route, root first.
    ///
    /// Empty when nothing is committed.
    pub fn ancestors(&self) -> Vec<RouteNode> {
        let (name, params) = self.query_defaults();
        self.ancestors_of(&name, &params)
    }

    /// Ancestor chain of a named route, root first.
    ///
    /// Walks the full name up one segment at a time, keeping only registered
    /// names; the queried route itself is included (and flagged active).
    pub fn ancestors_of(&self, name: &str, params: &RouteParams) -> Vec<RouteNode> {
        let mut nodes = Vec::new();
        let mut segments: Vec<&str> = name.split('.').collect();
        while !segments.is_empty() {
            let candidate = segments.join(".");
            if let Some(template) = self.registry().template_of(&candidate) {
                nodes.push(self.node(&candidate, template, params, candidate == name));
            }
            segments.pop();
        }
        nodes.reverse();
        nodes
    }

    /// Strict descendants of the committed route.
    pub fn nodes(&self) -> Vec<RouteNode> {
        let (name, params) = self.query_defaults();
        self.nodes_of(&name, &params)
    }

    /// Strict descendants of a named route: every registered name prefixed
    /// by `name.`, in registration order.
    pub fn nodes_of(&self, name: &str, params: &RouteParams) -> Vec<RouteNode> {
        let prefix = format!("{}.", name);
        self.collect(|candidate| candidate.starts_with(&prefix), name, params)
    }

    /// Siblings of the committed route.
    pub fn siblings(&self) -> Vec<RouteNode> {
        let (name, params) = self.query_defaults();
        self.siblings_of(&name, &params)
    }

    /// Siblings of a named route: every registered name under the same
    /// parent, the queried route included and flagged active, its own
    /// descendants excluded. A top-level name has no siblings.
    pub fn siblings_of(&self, name: &str, params: &RouteParams) -> Vec<RouteNode> {
        let parent: Vec<&str> = name.split('.').collect();
        let parent = &parent[..parent.len().saturating_sub(1)];
        let prefix = format!("{}.", parent.join("."));
        let own_subtree = format!("{}.", name);
        self.collect(
            |candidate| candidate.starts_with(&prefix) && !candidate.starts_with(&own_subtree),
            name,
            params,
        )
    }

    /// `true` when the committed route sits strictly below the given name.
    pub fn is_ancestor(&self, name: &str) -> bool {
        match self.current() {
            Some(current) => current.name.starts_with(&format!("{}.", name)),
            None => false,
        }
    }

    fn query_defaults(&self) -> (String, RouteParams) {
        match self.current() {
            Some(current) => (current.name.clone(), current.parameters.clone()),
            None => (String::new(), RouteParams::new()),
        }
    }

    fn collect<F>(&self, keep: F, active_name: &str, params: &RouteParams) -> Vec<RouteNode>
    where
        F: Fn(&str) -> bool,
    {
        self.registry()
            .entries()
            .iter()
            .filter_map(|entry| {
                let name = entry.name.as_deref()?;
                let template = entry.template.as_deref()?;
                if keep(name) {
                    Some(self.node(name, template, params, name == active_name))
                } else {
                    None
                }
            })
            .collect()
    }

    fn node(&self, name: &str, template: &str, params: &RouteParams, active: bool) -> RouteNode {
        RouteNode {
            name: name.to_string(),
            template: template.to_string(),
            url: build_url(template, &UrlParams::Named(params.clone())),
            active,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

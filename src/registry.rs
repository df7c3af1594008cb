//! The ordered route table.
//!
//! Every registration appends a [`RouteEntry`] — name, template, compiled
//! pattern and handler — to the [`RouteRegistry`]. Entries are immutable
//! once created. Name lookups scan in order and return the first match;
//! fragment dispatch likewise honors registration order, so overlapping
//! templates resolve to whichever was registered first.

use crate::pattern::RoutePattern;
use crate::route::Handler;

/// One registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Route name, dot-delimited for hierarchy queries
    pub name: Option<String>,
    /// Template text, `None` for pattern-only registrations
    pub template: Option<String>,
    /// Compiled matcher
    pub pattern: RoutePattern,
    /// Dispatch target
    pub handler: Handler,
}

/// Append-only, ordered collection of route entries.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    entries: Vec<RouteEntry>,
    generation: u64,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// A duplicate name is reported but not rejected; the earlier entry keeps
    /// winning lookups.
    pub fn add(&mut self, entry: RouteEntry) {
        if let Some(name) = &entry.name {
            if let Some(existing) = self.find(name) {
                crate::warn_log!(
                    "Route `{}` already assigned: {}",
                    name,
                    existing.template.as_deref().unwrap_or("<pattern>")
                );
            }
        }
        self.entries.push(entry);
        self.generation += 1;
    }

    /// First entry registered under the given name.
    pub fn find(&self, name: &str) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
    }

    /// Template of the named entry.
    pub fn template_of(&self, name: &str) -> Option<&str> {
        self.find(name)?.template.as_deref()
    }

    /// Handler of the named entry.
    pub fn handler_of(&self, name: &str) -> Option<&Handler> {
        self.find(name).map(|entry| &entry.handler)
    }

    /// First entry whose pattern matches the fragment, with its index.
    pub fn match_fragment(&self, fragment: &str) -> Option<(usize, &RouteEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.pattern.matches(fragment))
    }

    /// Entry at the given index.
    pub fn entry(&self, index: usize) -> Option<&RouteEntry> {
        self.entries.get(index)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic counter bumped on every registration.
    ///
    /// Dispatch caches key on this to drop stale fragment mappings.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Derive a route name from its template.
///
/// Each `/:`, `/*` or bare `/` becomes `-` and the result is lowercased:
/// `show/all` → `show-all`, `user/:id` → `user-id`.
pub fn derive_name(template: &str) -> String {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' {
            if matches!(chars.peek(), Some(':') | Some('*')) {
                chars.next();
            }
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out.to_lowercase()
}

// ============================================================================
// Tests
// ============================================================================

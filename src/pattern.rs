//! Route template compilation and URL construction.
//!
//! Templates mix literal segments with three dynamic markers:
//!
//! - `:name` — a named parameter matching exactly one segment.
//! - `*name` — a greedy splat matching across segment boundaries.
//! - `( ... )` — an optional group; everything inside may be absent.
//!
//! [`RoutePattern`] compiles a template once into an anchored [`Regex`] and
//! records the parameter keys in template order. The free functions
//! [`build_url`], [`serialize_params`] and [`deserialize_params`] run the
//! template the other way: from parameter values back to a URL fragment.
//!
//! The reserved key `params` marks a catch-all bucket: when building a URL
//! from a named map, every key not consumed by another marker is serialized
//! as `key:value` pairs joined by `+` and appended as one final segment.
//!
//! # Example
//!
//! ```
//! use wayfinder::pattern::{RoutePattern, build_url, UrlParams};
//! use wayfinder::RouteParams;
//!
//! let pattern = RoutePattern::compile("users/:id(/edit)").unwrap();
//! assert!(pattern.matches("users/42/edit"));
//!
//! let extracted = pattern.extract("users/42").unwrap();
//! assert_eq!(extracted, vec![Some("42".to_string())]);
//!
//! let mut params = RouteParams::new();
//! params.set("id".to_string(), "42".to_string());
//! assert_eq!(build_url("users/:id(/edit)", &UrlParams::Named(params)), "users/42/edit");
//! ```

use crate::error::NavigationError;
use crate::params::RouteParams;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Reserved parameter key naming the catch-all bucket segment.
pub const BUCKET_KEY: &str = "params";

/// Matcher for `/:key` and `/*key` markers, with or without the separator.
fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"/?[:*](\w+)").unwrap())
}

// ============================================================================
// RoutePattern
// ============================================================================

/// A compiled route template.
///
/// Compilation is done once at registration; matching and extraction then
/// reuse the anchored regex.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
    keys: Vec<String>,
}

impl RoutePattern {
    /// Compile a template into an anchored matcher.
    ///
    /// Returns [`NavigationError::InvalidPattern`] when the template cannot
    /// be expressed as a regex (e.g. unbalanced optional groups).
    pub fn compile(template: &str) -> Result<Self, NavigationError> {
        let mut pattern = String::from("^");
        let mut keys = Vec::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '(' => pattern.push_str("(?:"),
                ')' => pattern.push_str(")?"),
                ':' | '*' => {
                    let mut key = String::new();
                    while let Some(&next) = chars.peek() {
                        if next.is_alphanumeric() || next == '_' {
                            key.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if key.is_empty() {
                        // Bare `:` or `*` with no key is a literal
                        pattern.push_str(&regex::escape(&c.to_string()));
                    } else {
                        pattern.push_str(if c == ':' { "([^/?]+)" } else { "([^?]*?)" });
                        keys.push(key);
                    }
                }
                _ => pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|err| NavigationError::InvalidPattern {
            template: template.to_string(),
            message: err.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            keys,
        })
    }

    /// The original template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter keys in template order, one per capture.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Check whether a fragment matches this pattern.
    pub fn matches(&self, fragment: &str) -> bool {
        self.regex.is_match(fragment)
    }

    /// Extract positional parameter values from a matching fragment.
    ///
    /// Returns one slot per key in template order; a key inside an optional
    /// group that did not participate in the match (or captured an empty
    /// string) yields `None`. A non-matching fragment returns `None` overall.
    pub fn extract(&self, fragment: &str) -> Option<Vec<Option<String>>> {
        let captures = self.regex.captures(fragment)?;
        let values = (1..=self.keys.len())
            .map(|i| {
                captures
                    .get(i)
                    .map(|m| m.as_str().to_string())
                    .filter(|v| !v.is_empty())
            })
            .collect();
        Some(values)
    }
}

// ============================================================================
// URL construction
// ============================================================================

/// Parameter source for [`build_url`].
#[derive(Debug, Clone)]
pub enum UrlParams {
    /// Values applied to markers left to right
    Positional(Vec<Option<String>>),
    /// Values looked up by marker key; unused keys feed the bucket
    Named(RouteParams),
}

impl UrlParams {
    /// Empty named parameter set.
    pub fn none() -> Self {
        UrlParams::Named(RouteParams::new())
    }
}

/// Substitute parameter values into a template, producing a URL fragment.
///
/// Optional-group parens are stripped; each `:key` / `*key` marker is
/// replaced with the named value (or the next positional one). A missing or
/// empty value collapses the marker together with its leading separator, so
/// `users(/*path)` with no `path` yields `users`. Present values join with
/// `/`.
///
/// With [`UrlParams::Named`], a marker keyed `params` turns on the catch-all
/// bucket: every remaining unused, non-empty key is serialized through
/// [`serialize_params`] and appended as one final segment.
pub fn build_url(template: &str, params: &UrlParams) -> String {
    let stripped: String = template.chars().filter(|c| *c != '(' && *c != ')').collect();

    let mut used: Vec<String> = Vec::new();
    let mut index = 0usize;
    let mut append_bucket = false;

    let url = marker_regex().replace_all(&stripped, |caps: &Captures<'_>| {
        let key = &caps[1];
        let at_start = caps.get(0).map(|m| m.start() == 0).unwrap_or(false);

        let value = match params {
            UrlParams::Named(map) => map.get(key).filter(|v| !v.is_empty()).cloned(),
            UrlParams::Positional(list) => {
                let v = list.get(index).cloned().flatten().filter(|v| !v.is_empty());
                index += 1;
                v
            }
        };

        if key == BUCKET_KEY {
            append_bucket = true;
        }

        match value {
            Some(v) => {
                used.push(key.to_string());
                if at_start {
                    v
                } else {
                    format!("/{}", v)
                }
            }
            None => String::new(),
        }
    });
    let mut url = url.into_owned();

    if append_bucket {
        if let UrlParams::Named(map) = params {
            let rest: RouteParams = map
                .iter()
                .filter(|(k, v)| !used.contains(k) && !v.is_empty())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let serialized = serialize_params(&rest);
            if !serialized.is_empty() {
                if url.is_empty() {
                    url = serialized;
                } else {
                    url = format!("{}/{}", url, serialized);
                }
            }
        }
    }

    url
}

/// Serialize a parameter map into a single bucket segment.
///
/// Keys with empty values are dropped; pairs render as `key:value` joined by
/// `+`, sorted by key so the output is deterministic.
pub fn serialize_params(params: &RouteParams) -> String {
    let mut pairs: Vec<(&String, &String)> =
        params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{}:{}", k, v))
        .collect::<Vec<_>>()
        .join("+")
}

/// Parse a bucket segment back into a parameter map.
///
/// Inverse of [`serialize_params`]; empty input yields an empty map, a pair
/// without a `:` separator maps its key to an empty value.
pub fn deserialize_params(segment: &str) -> RouteParams {
    let mut params = RouteParams::new();
    if segment.is_empty() {
        return params;
    }
    for pair in segment.split('+') {
        match pair.split_once(':') {
            Some((key, value)) => params.insert(key.to_string(), value.to_string()),
            None => params.insert(pair.to_string(), String::new()),
        }
    }
    params
}

/// Join a root prefix and a URL fragment.
///
/// Either side may be empty; both empty yields an empty string.
pub fn compose_root(root: &str, url: &str) -> String {
    if url.is_empty() {
        root.to_string()
    } else if root.is_empty() {
        url.to_string()
    } else {
        format!("{}/{}", root, url)
    }
}

// ============================================================================
// Tests
// ============================================================================

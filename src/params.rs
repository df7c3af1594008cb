//! Named route parameters.
//!
//! [`RouteParams`] is the string map carried through every navigation: route
//! defaults, values extracted from dynamic template segments (e.g. `:id` in
//! `users/:id`), and any catch-all pairs deserialized from a `*params`
//! bucket segment. Supports typed access via [`get_as`](RouteParams::get_as)
//! and base-overlay merging via [`merge`](RouteParams::merge).
//!
//! # Example
//!
//! ```
//! use wayfinder::RouteParams;
//!
//! // Parameters extracted from users/42
//! let mut params = RouteParams::new();
//! params.set("id".to_string(), "42".to_string());
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//! ```

use std::collections::HashMap;

/// Named parameters resolved for a navigation.
///
/// # Example
///
/// ```
/// use wayfinder::RouteParams;
///
/// // Route template: users/:id
/// // Matched fragment: users/123
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "123".to_string());
///
/// assert_eq!(params.get("id"), Some(&"123".to_string()));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Set a parameter (alias for [`insert`](Self::insert)).
    pub fn set(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying parameter map.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge base parameters with overriding parameters
    ///
    /// Override values win in case of collision. Used to apply route defaults
    /// under extracted values, and to apply explicit overrides when building
    /// URLs from a committed navigation.
    ///
    /// # Example
    ///
    /// ```
    /// use wayfinder::RouteParams;
    ///
    /// let mut base = RouteParams::new();
    /// base.set("id".to_string(), "123".to_string());
    /// base.set("view".to_string(), "list".to_string());
    ///
    /// let mut overrides = RouteParams::new();
    /// overrides.set("view".to_string(), "grid".to_string());
    ///
    /// let merged = RouteParams::merge(&base, &overrides);
    /// assert_eq!(merged.get("id"), Some(&"123".to_string()));
    /// assert_eq!(merged.get("view"), Some(&"grid".to_string()));
    /// ```
    pub fn merge(base: &RouteParams, overrides: &RouteParams) -> RouteParams {
        let mut merged = base.clone();

        for (key, value) in overrides.iter() {
            merged.insert(key.clone(), value.clone());
        }

        merged
    }

    /// Fill in missing keys from the given defaults.
    ///
    /// Existing values are never overwritten.
    pub fn apply_defaults(&mut self, defaults: &RouteParams) {
        for (key, value) in defaults.iter() {
            if !self.params.contains_key(key) {
                self.params.insert(key.clone(), value.clone());
            }
        }
    }
}

impl FromIterator<(String, String)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

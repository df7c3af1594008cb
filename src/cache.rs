//! LRU cache for fragment dispatch.
//!
//! Matching a fragment scans the registry in order; hosts that dispatch the
//! same fragments repeatedly can skip the scan with this cache. Enabled with
//! the `cache` feature and consulted transparently by the router.
//!
//! Entries are keyed by fragment and pinned to the registry generation that
//! produced them, so any registration invalidates the whole cache.

use crate::error::NavigationError;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default number of cached fragments.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Hit/miss counters for a [`DispatchCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to a registry scan
    pub misses: u64,
}

impl CacheStats {
    /// Hit ratio in `[0.0, 1.0]`; zero when nothing was looked up.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Fragment → registry-index cache with LRU eviction.
#[derive(Debug)]
pub struct DispatchCache {
    entries: LruCache<String, usize>,
    generation: u64,
    stats: CacheStats,
}

impl DispatchCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CACHE_CAPACITY)
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Create a cache holding at most `capacity` fragments.
    pub fn with_capacity(capacity: usize) -> Result<Self, NavigationError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| NavigationError::custom("dispatch cache capacity must be non-zero"))?;
        Ok(Self {
            entries: LruCache::new(capacity),
            generation: 0,
            stats: CacheStats::default(),
        })
    }

    /// Look up the registry index cached for a fragment.
    ///
    /// A generation mismatch clears the cache first, so stale indices are
    /// never returned.
    pub fn get(&mut self, fragment: &str, generation: u64) -> Option<usize> {
        if generation != self.generation {
            self.entries.clear();
            self.generation = generation;
        }
        match self.entries.get(fragment) {
            Some(&index) => {
                self.stats.hits += 1;
                Some(index)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Record the registry index a fragment dispatched to.
    pub fn insert(&mut self, fragment: &str, index: usize, generation: u64) {
        if generation != self.generation {
            self.entries.clear();
            self.generation = generation;
        }
        self.entries.put(fragment.to_string(), index);
    }

    /// Drop every cached fragment and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached fragments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

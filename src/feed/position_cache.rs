use std::num::NonZeroUsize;

use lru::LruCache;

/// Default number of object ids remembered by [`PositionCache`].
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded LRU map from object id to row position.
///
/// Positions are only meaningful for the result set that was bound when they
/// were recorded. The owner must call [`PositionCache::clear`] in the same
/// step that replaces the result set: a miss degrades to a linear scan, a
/// stale hit returns the wrong row.
pub struct PositionCache {
    entries: LruCache<String, usize>,
}

impl PositionCache {
    /// Create a cache holding at most `capacity` ids. Zero selects
    /// [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Position recorded for `id`, marking it most recently used.
    pub fn lookup(&mut self, id: &str) -> Option<usize> {
        self.entries.get(id).copied()
    }

    /// Insert or refresh `id`, evicting the least recently used id when full.
    pub fn record(&mut self, id: &str, position: usize) {
        if let Some((evicted, _)) = self.entries.push(id.to_string(), position) {
            if evicted != id {
                tracing::trace!(evicted = %evicted, "Position cache evicted LRU entry");
            }
        }
    }

    /// Forget every recorded position.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

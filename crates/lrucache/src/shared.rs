//! SharedLruCache: LRU cache behind a single lock, with statistics

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Thread-safe wrapper around [`LruCache`]
///
/// List and index sit behind one mutex and every method takes it exactly
/// once, so no caller can see one updated without the other. A mutex rather
/// than a read/write lock: `contains` reorders the list.
pub struct SharedLruCache<T> {
    /// LRU cache for hot values
    cache: Mutex<LruCache<T>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<T> SharedLruCache<T>
where
    T: Hash + Eq + Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Returns
    /// * `Result<SharedLruCache>` - `Error::ZeroCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    /// Create a new shared cache with a capacity that cannot be zero
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::from_cache(LruCache::with_capacity(capacity))
    }

    /// Wrap an existing cache, keeping its contents
    pub fn from_cache(cache: LruCache<T>) -> Self {
        Self {
            cache: Mutex::new(cache),
            stats: CacheStats::new(),
        }
    }

    /// Insert a value as the most recently used one
    ///
    /// # Returns
    /// * `Option<T>` - The value evicted to make room, if any
    pub fn insert(&self, value: T) -> Option<T> {
        let (evicted, len) = {
            let mut cache = self.cache.lock();
            let evicted = cache.insert(value);
            (evicted, cache.len())
        };

        self.stats.record_insert();
        if evicted.is_some() {
            self.stats.record_evictions(1);
            trace!(len, "evicted least recently used value");
        }
        evicted
    }

    /// Check if a value is cached, promoting it on a hit
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hit = self.cache.lock().contains(value);
        if hit {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        hit
    }

    /// Check if a value is cached without touching recency or statistics
    pub fn contains_untouched<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains_untouched(value)
    }

    /// Most recently used value
    pub fn peek(&self) -> Option<T> {
        self.cache.lock().peek().cloned()
    }

    /// Least recently used value
    pub fn peek_lru(&self) -> Option<T> {
        self.cache.lock().peek_lru().cloned()
    }

    /// Remove a value from the cache
    pub fn remove<Q>(&self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.cache.lock().remove(value);
        if removed.is_some() {
            self.stats.record_removal();
        }
        removed
    }

    /// Change the capacity, evicting from the LRU end if the cache shrinks
    ///
    /// # Returns
    /// * `Vec<T>` - Evicted values, least recently used first
    pub fn set_capacity(&self, capacity: NonZeroUsize) -> Vec<T> {
        let evicted = self.cache.lock().set_capacity(capacity);
        if !evicted.is_empty() {
            self.stats.record_evictions(evicted.len() as u64);
            trace!(
                capacity = capacity.get(),
                evicted = evicted.len(),
                "shrunk cache"
            );
        }
        evicted
    }

    /// Copy of the cached values, most recently used first
    pub fn snapshot(&self) -> Vec<T> {
        self.cache.lock().iter().cloned().collect()
    }

    /// Remove and return every value, most recently used first
    pub fn drain(&self) -> Vec<T> {
        self.cache.lock().drain().collect()
    }

    /// Run `f` with the cache locked, for several steps that must not
    /// interleave with other callers. Statistics are not recorded.
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<T>) -> R) -> R {
        f(&mut *self.cache.lock())
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }
}

impl<T> SharedLruCache<T> {
    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedLruCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLruCache")
            .field("cache", &*self.cache.lock())
            .field("stats", &self.stats)
            .finish()
    }
}

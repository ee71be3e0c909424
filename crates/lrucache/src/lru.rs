//! LRU (Least Recently Used) cache implementation
//!
//! The list holds values in recency order (head = most recent). The index maps
//! every cached value to the handle of the node holding it, so finding the
//! node to promote is a hash lookup and the promotion itself is a relink.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use ahash::RandomState;
use dlist::{DoublyLinkedList, Iter, NodeHandle};

use crate::error::{Error, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 1 << 16;

/// LRU cache with fixed capacity
///
/// Each value is stored once in the list and once (as the key) in the index.
/// The two always describe the same set: every list node has exactly one
/// index entry pointing at it and vice versa.
pub struct LruCache<T, S = RandomState> {
    index: HashMap<T, NodeHandle, S>,
    list: DoublyLinkedList<T>,
    capacity: NonZeroUsize,
}

impl<T> LruCache<T>
where
    T: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::ZeroCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(Error::ZeroCapacity)?;
        Ok(Self::with_capacity(capacity))
    }

    /// Create a new LRU cache with a capacity that cannot be zero
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<T, S> LruCache<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using `hasher` for the index
    pub fn with_hasher(capacity: NonZeroUsize, hasher: S) -> Self {
        let prealloc = capacity.get().min(MAX_PREALLOC);

        Self {
            index: HashMap::with_capacity_and_hasher(prealloc, hasher),
            list: DoublyLinkedList::with_capacity(prealloc),
            capacity,
        }
    }

    /// Insert a value as the most recently used one
    ///
    /// A value already in the cache is promoted instead of stored twice. When
    /// the cache is full, the least recently used value makes room first.
    ///
    /// # Returns
    /// * `Option<T>` - The value evicted to make room, if any
    pub fn insert(&mut self, value: T) -> Option<T> {
        if let Some(&handle) = self.index.get(&value) {
            let promoted = self.list.move_to_front(handle);
            debug_assert!(promoted, "index entry points at a node outside the list");
            return None;
        }

        let evicted = if self.list.len() >= self.capacity.get() {
            self.pop_lru()
        } else {
            None
        };

        let handle = self.list.push(value.clone());
        self.index.insert(value, handle);

        self.debug_check_counts();
        evicted
    }

    /// Check if a value is cached, marking it as just used when it is
    ///
    /// A hit moves the value to the head. A miss changes nothing.
    pub fn contains<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(value) {
            Some(&handle) => {
                let promoted = self.list.move_to_front(handle);
                debug_assert!(promoted, "index entry points at a node outside the list");
                true
            }
            None => false,
        }
    }

    /// Check if a value is cached without touching its recency
    pub fn contains_untouched<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(value)
    }

    /// Most recently used value
    pub fn peek(&self) -> Option<&T> {
        self.list.peek()
    }

    /// Least recently used value, i.e. the next one to be evicted
    pub fn peek_lru(&self) -> Option<&T> {
        self.list.peek_last()
    }

    /// Remove a value from the cache
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.remove(value)?;
        let removed = self.list.eject(handle);
        debug_assert!(removed.is_some(), "index entry points at a node outside the list");

        self.debug_check_counts();
        removed
    }

    /// Evict the least recently used value
    pub fn pop_lru(&mut self) -> Option<T> {
        let value = self.list.pop_last()?;
        let unindexed = self.index.remove(&value);
        debug_assert!(unindexed.is_some(), "list node had no index entry");

        self.debug_check_counts();
        Some(value)
    }

    /// Change the capacity, evicting from the LRU end if the cache shrinks
    ///
    /// # Returns
    /// * `Vec<T>` - Evicted values, least recently used first
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) -> Vec<T> {
        self.capacity = capacity;

        let mut evicted = Vec::new();
        while self.list.len() > capacity.get() {
            match self.pop_lru() {
                Some(value) => evicted.push(value),
                None => break,
            }
        }
        evicted
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Drain values from most to least recently used
    ///
    /// Each step removes the current head. Values not pulled before the
    /// `Drain` is dropped stay cached.
    pub fn drain(&mut self) -> Drain<'_, T, S> {
        Drain { cache: self }
    }

    /// Check every invariant between list and index, panicking on violation
    ///
    /// O(n); meant for tests and debugging sessions.
    #[cfg(any(test, debug_assertions))]
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();

        assert!(
            self.list.len() <= self.capacity.get(),
            "{} values cached with capacity {}",
            self.list.len(),
            self.capacity
        );
        assert_eq!(self.index.len(), self.list.len(), "index and list sizes differ");

        for (value, &handle) in &self.index {
            assert!(
                self.list.get(handle) == Some(value),
                "index entry does not resolve to its own value"
            );
        }

        let mut cursor = self.list.head();
        while let Some(handle) = cursor {
            let Some(value) = self.list.get(handle) else {
                panic!("list walk produced a dangling handle");
            };
            assert_eq!(
                self.index.get(value),
                Some(&handle),
                "list node is not the one its index entry points at"
            );
            cursor = self.list.next(handle);
        }
    }

    #[inline]
    fn debug_check_counts(&self) {
        debug_assert!(self.list.len() <= self.capacity.get(), "capacity exceeded");
        debug_assert_eq!(self.index.len(), self.list.len(), "index and list sizes differ");
    }
}

impl<T, S> LruCache<T, S> {
    /// Get the current number of cached values
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Iterate from most to least recently used without touching anything
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for LruCache<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.list)
            .finish()
    }
}

impl<T, S> IntoIterator for LruCache<T, S> {
    type Item = T;
    type IntoIter = dlist::IntoIter<T>;

    /// Consume the cache, most recently used first
    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a, T, S> IntoIterator for &'a LruCache<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Draining iterator over an [`LruCache`], most recently used first
pub struct Drain<'a, T, S = RandomState> {
    cache: &'a mut LruCache<T, S>,
}

impl<T, S> Iterator for Drain<'_, T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.cache.list.pop()?;
        let unindexed = self.cache.index.remove(&value);
        debug_assert!(unindexed.is_some(), "list node had no index entry");
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cache.len(), Some(self.cache.len()))
    }
}

impl<T, S> ExactSizeIterator for Drain<'_, T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
}

impl<T, S> FusedIterator for Drain<'_, T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8),
        Contains(u8),
        ContainsUntouched(u8),
        Remove(u8),
        PopLru,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..32).prop_map(Op::Insert),
            3 => (0u8..32).prop_map(Op::Contains),
            1 => (0u8..32).prop_map(Op::ContainsUntouched),
            1 => (0u8..32).prop_map(Op::Remove),
            1 => Just(Op::PopLru),
        ]
    }

    fn promote(model: &mut VecDeque<u8>, value: u8) -> bool {
        match model.iter().position(|&v| v == value) {
            Some(at) => {
                model.remove(at);
                model.push_front(value);
                true
            }
            None => false,
        }
    }

    proptest! {
        /// len() never exceeds capacity.
        #[test]
        fn prop_len_within_capacity(
            capacity in 1usize..20,
            values in prop::collection::vec(any::<u16>(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            for value in values {
                cache.insert(value);
                prop_assert!(cache.len() <= cache.capacity());
            }
        }

        /// Distinct inserts up to capacity leave the last one at the head.
        #[test]
        fn prop_last_insert_is_peek(values in prop::collection::hash_set(any::<u32>(), 1..50)) {
            let values: Vec<_> = values.into_iter().collect();
            let mut cache = LruCache::new(values.len()).unwrap();
            for &value in &values {
                cache.insert(value);
            }
            prop_assert_eq!(cache.peek(), values.last());
            prop_assert_eq!(cache.len(), values.len());
        }

        /// Absent values stay absent and never disturb the order.
        #[test]
        fn prop_absent_is_idempotent(
            values in prop::collection::vec(0u16..100, 0..50),
            probe in 100u16..200,
            repeats in 1usize..5
        ) {
            let mut cache = LruCache::new(16).unwrap();
            for value in values {
                cache.insert(value);
            }
            let before: Vec<_> = cache.iter().copied().collect();
            for _ in 0..repeats {
                prop_assert!(!cache.contains(&probe));
            }
            prop_assert!(cache.iter().copied().eq(before));
        }

        /// The cache matches a naive recency list and keeps list and index in
        /// one-to-one correspondence after every operation.
        #[test]
        fn prop_matches_model(
            capacity in 1usize..10,
            ops in prop::collection::vec(op(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            let mut model: VecDeque<u8> = VecDeque::new();

            for op in ops {
                match op {
                    Op::Insert(v) => {
                        let expected = if promote(&mut model, v) {
                            None
                        } else {
                            let evicted = if model.len() == capacity {
                                model.pop_back()
                            } else {
                                None
                            };
                            model.push_front(v);
                            evicted
                        };
                        prop_assert_eq!(cache.insert(v), expected);
                    }
                    Op::Contains(v) => {
                        prop_assert_eq!(cache.contains(&v), promote(&mut model, v));
                    }
                    Op::ContainsUntouched(v) => {
                        prop_assert_eq!(cache.contains_untouched(&v), model.contains(&v));
                    }
                    Op::Remove(v) => {
                        let expected = model
                            .iter()
                            .position(|&m| m == v)
                            .and_then(|at| model.remove(at));
                        prop_assert_eq!(cache.remove(&v), expected);
                    }
                    Op::PopLru => {
                        prop_assert_eq!(cache.pop_lru(), model.pop_back());
                    }
                }

                cache.debug_validate_invariants();
                prop_assert!(cache.iter().eq(model.iter()));
                prop_assert_eq!(cache.peek(), model.front());
            }
        }
    }
}

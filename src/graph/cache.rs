// src/graph/cache.rs
//! Fixed-capacity caches.
//!
//! [`BoundedCache`] is the seam; [`LruStore`] is the default policy.
//! [`StampedCache`] layers modification-time validation on top: an entry is
//! only returned while its stored [`FileStamp`] equals the caller's.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::source::FileStamp;

/// A cache with a fixed capacity and an eviction policy.
pub trait BoundedCache<K, V> {
    fn get(&mut self, key: &K) -> Option<&V>;
    fn put(&mut self, key: K, value: V);
    fn remove(&mut self, key: &K) -> Option<V>;
    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Least-recently-used eviction.
#[derive(Debug)]
pub struct LruStore<K: Hash + Eq, V> {
    inner: LruCache<K, V>,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(cap),
        }
    }
}

impl<K: Hash + Eq, V> BoundedCache<K, V> for LruStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.inner.put(key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.pop(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Stamped<V> {
    pub stamp: FileStamp,
    pub value: V,
}

/// Per-file cache valid only while the file's stamp is unchanged.
#[derive(Debug)]
pub struct StampedCache<V, C = LruStore<String, Stamped<V>>>
where
    C: BoundedCache<String, Stamped<V>>,
{
    store: C,
    hits: u64,
    misses: u64,
    _marker: std::marker::PhantomData<V>,
}

impl<V: Clone> StampedCache<V> {
    #[must_use]
    pub fn lru(capacity: usize) -> Self {
        Self::with_store(LruStore::new(capacity))
    }
}

impl<V: Clone, C: BoundedCache<String, Stamped<V>>> StampedCache<V, C> {
    #[must_use]
    pub fn with_store(store: C) -> Self {
        Self {
            store,
            hits: 0,
            misses: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the cached value when `stamp` still matches. A stale entry is
    /// dropped.
    pub fn get(&mut self, key: &str, stamp: FileStamp) -> Option<V> {
        let key = key.to_string();
        let fresh = match self.store.get(&key) {
            Some(entry) if entry.stamp == stamp => Some(entry.value.clone()),
            Some(_) => {
                self.store.remove(&key);
                None
            }
            None => None,
        };
        if fresh.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        fresh
    }

    pub fn put(&mut self, key: &str, stamp: FileStamp, value: V) {
        self.store.put(key.to_string(), Stamped { stamp, value });
    }

    pub fn invalidate(&mut self, key: &str) {
        self.store.remove(&key.to_string());
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// `(hits, misses)` since construction.
    #[must_use]
    pub fn counters(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

//! Content-keyed in-memory caches.
//!
//! Caches here are optimizations, never sources of truth: keys are BLAKE3
//! content hashes (see [`crate::hashing`]) and values can be dropped at any
//! time without affecting correctness. Injected as capabilities so the
//! engine stays a pure function of (inputs, capability set).


use moka::sync::Cache;

/// Default capacity for the judge-response cache.
pub const DEFAULT_JUDGMENT_CACHE_CAPACITY: u64 = 10_000;

/// Default capacity for the ranking result cache.
pub const DEFAULT_RESULT_CACHE_CAPACITY: u64 = 1_000;

/// A bounded cache keyed by 64-bit content hashes.
#[derive(Clone)]
pub struct ContentCache<V: Clone + Send + Sync + 'static> {
    inner: Cache<u64, V>,
}

impl<V: Clone + Send + Sync + 'static> ContentCache<V> {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, key: u64) -> Option<V> {
        self.inner.get(&key)
    }

    pub fn insert(&self, key: u64, value: V) {
        self.inner.insert(key, value);
    }

    /// Entry count after pending maintenance.
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for ContentCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

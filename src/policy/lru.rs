//! # Least Recently Used (LRU) cache
//!
//! Fixed-capacity key-value cache that evicts the least recently accessed
//! entry when a new key arrives at capacity. The core composes two
//! structures behind one API:
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                        LruCache<K, V>                         │
//!   │                                                               │
//!   │   ┌─────────────────────────────────────────────────────┐     │
//!   │   │  FxHashMap<K, SlotId>  (index: key → handle)        │     │
//!   │   │                                                     │     │
//!   │   │   key_a ──────────────────────────────┐             │     │
//!   │   │   key_b ────────────────┐             │             │     │
//!   │   │   key_c ──┐             │             │             │     │
//!   │   └───────────┼─────────────┼─────────────┼─────────────┘     │
//!   │               ▼             ▼             ▼                   │
//!   │   ┌─────────────────────────────────────────────────────┐     │
//!   │   │  RecencyList<Entry<K, V>>  (MRU → LRU)              │     │
//!   │   │                                                     │     │
//!   │   │   front ──► [c] ◄──► [b] ◄──► [a] ◄── back          │     │
//!   │   │            (MRU)             (victim)               │     │
//!   │   └─────────────────────────────────────────────────────┘     │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries live in the recency list's slot arena and are addressed by
//! stable [`SlotId`] handles; there are no raw pointers anywhere in the
//! implementation, so eviction cannot dangle and teardown is ordinary drop
//! glue.
//!
//! ## Operation flow
//!
//! ```text
//!   get(k)  hit:  index lookup ─► move handle to front ─► return &value
//!           miss: index lookup fails ─► None, no structural change
//!
//!   insert(k, v)
//!     k present:  replace value in place ─► move to front
//!     k absent,
//!     at capacity: pop back (victim) ─► drop victim key from index
//!     then:        push front ─► register k → handle in index
//! ```
//!
//! Both paths are O(1). Eviction happens on exactly one path: a new key
//! inserted while the cache is full.
//!
//! ## Concurrency model
//!
//! `LruCache` is single-threaded. [`ConcurrentLruCache`] (feature
//! `concurrency`) wraps it in `Arc<parking_lot::RwLock<..>>` and serializes
//! every recency-mutating operation behind the write lock. A `get` is a
//! writer: promotion on read mutates the list links, so read/write
//! separation would be unsound for it. Only operations that never touch
//! recency order (`peek`, `contains`, `len`, `capacity`, `snapshot`) take
//! the read lock. The lock is held for the full O(1) body of each
//! operation and never across I/O.
//!
//! ## Invariants
//!
//! - `len() <= capacity()` after every operation.
//! - The index and the recency list are in bijection: every indexed key
//!   owns exactly one live list entry and vice versa.
//! - Recency order is a strict total order; the victim is always the
//!   unique back entry.
//!
//! An index that points at a dead handle is a defect in this library, not
//! a user-facing error: debug builds fail fast via `debug_assert!` and the
//! post-operation validation, release builds degrade to a miss.

use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{LruMetrics, LruMetricsSnapshot};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;

/// One cached key-value pair; recency links live in the list node around it.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LRU cache core.
///
/// Not thread-safe; wrap it yourself or use [`ConcurrentLruCache`].
/// Keys are cloned once per entry (the index and the entry each own one),
/// so `K` should be cheap to clone.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.insert(1, 10);
/// cache.insert(2, 20);
///
/// assert_eq!(cache.get(&1), Some(&10)); // promotes key 1
/// cache.insert(3, 30);                  // evicts key 2, the LRU
///
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&3), Some(&30));
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to
    /// handle that case without panicking.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a cache holding at most `capacity` entries, rejecting a
    /// zero capacity as a configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// assert!(LruCache::<u64, String>::try_new(8).is_ok());
    /// assert!(LruCache::<u64, String>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be >= 1, got 0"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Gets a value by key, promoting the entry to most recently used.
    ///
    /// A miss is an ordinary `None`, never an error, and leaves the cache
    /// untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.get_calls += 1;
        }
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.get_misses += 1;
                }
                return None;
            },
        };
        #[cfg(feature = "metrics")]
        {
            self.metrics.get_hits += 1;
        }

        let promoted = self.list.move_to_front(id);
        debug_assert!(promoted, "index points at a dead recency handle");

        #[cfg(debug_assertions)]
        self.assert_consistent();

        self.list.get(id).map(|entry| &entry.value)
    }

    /// Looks up a value without touching recency order.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "a");
    /// cache.insert(2, "b");
    ///
    /// // Peek leaves key 1 as the victim
    /// assert_eq!(cache.peek(&1), Some(&"a"));
    /// cache.insert(3, "c");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.peek_calls.incr();

        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Inserts a key-value pair, returning the previous value on re-insert.
    ///
    /// A re-insert updates the value in place and promotes the entry. A new
    /// key at capacity evicts the least recently used entry first; that is
    /// the only path on which an eviction happens.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.insert_calls += 1;
        }

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.insert_updates += 1;
            }
            let previous = match self.list.get_mut(id) {
                Some(entry) => std::mem::replace(&mut entry.value, value),
                None => {
                    debug_assert!(false, "index points at a dead recency handle");
                    return None;
                },
            };
            self.list.move_to_front(id);

            #[cfg(debug_assertions)]
            self.assert_consistent();

            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.insert_new += 1;
        }

        if self.list.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        let displaced = self.index.insert(key, id);
        debug_assert!(displaced.is_none(), "new key was already indexed");

        #[cfg(debug_assertions)]
        self.assert_consistent();

        None
    }

    /// Removes a key-value pair, returning the value if the key existed.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.remove_calls += 1;
        }
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id);
        debug_assert!(entry.is_some(), "index points at a dead recency handle");

        #[cfg(debug_assertions)]
        self.assert_consistent();

        entry.map(|entry| entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.pop_lru_calls += 1;
        }
        let entry = self.list.pop_back()?;
        let unindexed = self.index.remove(&entry.key);
        debug_assert!(unindexed.is_some(), "victim key missing from index");

        #[cfg(debug_assertions)]
        self.assert_consistent();

        Some((entry.key, entry.value))
    }

    /// Peeks at the least recently used entry without removing or
    /// promoting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.peek_calls.incr();

        let id = self.list.back_id()?;
        self.list.get(id).map(|entry| (&entry.key, &entry.value))
    }

    /// Marks an entry as recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found.
    pub fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        {
            self.metrics.touch_calls += 1;
        }
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => return false,
        };
        let promoted = self.list.move_to_front(id);
        debug_assert!(promoted, "index points at a dead recency handle");

        #[cfg(debug_assertions)]
        self.assert_consistent();

        promoted
    }

    /// Checks if a key is cached without touching recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current number of entries. Never exceeds [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Recency rank of a key: 0 is most recently used. O(n) scan over the
    /// list; intended for tests and diagnostics.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let target = *self.index.get(key)?;
        self.list.iter_ids().position(|id| id == target)
    }

    /// Iterates over `(key, value)` pairs from most to least recently used
    /// without changing recency order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Clones the live entries in recency order (MRU first).
    ///
    /// Diagnostic state dump; the cache itself never depends on it.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(3);
    /// cache.insert(1, 10);
    /// cache.insert(2, 20);
    /// cache.get(&1);
    ///
    /// assert_eq!(cache.snapshot(), vec![(1, 10), (2, 20)]);
    /// ```
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Evicts the back (LRU) entry. Caller checks capacity; the list is
    /// never empty here because `capacity >= 1`.
    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            let unindexed = self.index.remove(&entry.key);
            debug_assert!(unindexed.is_some(), "victim key missing from index");
            #[cfg(feature = "metrics")]
            {
                self.metrics.evicted_entries += 1;
            }
        }
    }

    /// Verifies the capacity and index/list bijection invariants.
    ///
    /// An `Err` indicates a defect in this library; correct usage cannot
    /// produce one. Available in all build profiles so integration tests
    /// and callers can audit a cache without relying on debug assertions.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(
                        "index maps a key to an entry holding a different key",
                    ));
                },
                None => {
                    return Err(InvariantError::new("index points at a dead handle"));
                },
            }
        }
        // Chain coverage: the walk must visit exactly len() entries, each
        // indexed under its own key.
        let mut walked = 0usize;
        for (id, entry) in self.list.iter_entries() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(
                    "list entry is not indexed under its own key",
                ));
            }
            walked += 1;
            if walked > self.list.len() {
                return Err(InvariantError::new("cycle in recency chain"));
            }
        }
        if walked != self.list.len() {
            return Err(InvariantError::new(format!(
                "recency chain covers {} of {} entries",
                walked,
                self.list.len()
            )));
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn assert_consistent(&self) {
        self.list.debug_validate_invariants();
        if let Err(err) = self.check_invariants() {
            panic!("cache invariant violated: {}", err);
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Copies the operation counters plus current occupancy.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evicted_entries: self.metrics.evicted_entries,
            remove_calls: self.metrics.remove_calls,
            pop_lru_calls: self.metrics.pop_lru_calls,
            touch_calls: self.metrics.touch_calls,
            peek_calls: self.metrics.peek_calls.get(),
            len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LruCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruCache::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCache::peek_lru(self)
    }

    fn touch(&mut self, key: &K) -> bool {
        LruCache::touch(self, key)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruCache::recency_rank(self, key)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// ---------------------------------------------------------------------------
// ConcurrentLruCache
// ---------------------------------------------------------------------------

/// Thread-safe LRU cache handle.
///
/// Wraps [`LruCache`] in `Arc<parking_lot::RwLock<..>>`; cloning the handle
/// shares the same cache. Values are stored as `Arc<V>` so callers receive
/// owned handles and never hold references into the critical section —
/// an evicted value stays alive for whoever already holds its `Arc`.
///
/// Every recency-mutating operation, including `get`, takes the write
/// lock: promotion on read mutates shared list links, so no two such
/// operations ever run concurrently.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::ConcurrentLruCache;
///
/// let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(2);
/// cache.insert(1, "ten".to_string());
/// cache.insert(2, "twenty".to_string());
///
/// assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("ten"));
/// cache.insert(3, "thirty".to_string()); // evicts key 2
/// assert!(cache.get(&2).is_none());
/// ```
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<RwLock<LruCache<K, Arc<V>>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a thread-safe cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible constructor rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(LruCache::try_new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous `Arc<V>` if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Inserts an already-shared `Arc<V>` without re-wrapping it.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Gets a value by key, promoting it to most recently used.
    ///
    /// Takes the write lock: promotion mutates the recency list even
    /// though this is logically a read.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.get(key).map(Arc::clone)
    }

    /// Looks up a value without touching recency order (read lock only).
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let cache = self.inner.read();
        cache.peek(key).map(Arc::clone)
    }

    /// Removes an entry, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        let mut cache = self.inner.write();
        cache.pop_lru()
    }

    /// Marks an entry as recently used; `true` if the key was found.
    pub fn touch(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.touch(key)
    }

    /// Checks if a key is cached without touching recency order.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        cache.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        let cache = self.inner.read();
        cache.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        cache.capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    /// Clones the live entries in recency order (MRU first), consistent
    /// under the lock. Diagnostic use only.
    pub fn snapshot(&self) -> Vec<(K, Arc<V>)> {
        let cache = self.inner.read();
        cache.snapshot()
    }

    /// Copies the operation counters plus current occupancy.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        let cache = self.inner.read();
        cache.metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentCache for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

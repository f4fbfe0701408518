//! lrukit: a fixed-capacity LRU cache built on stable-handle internals.
//!
//! The crate provides [`policy::lru::LruCache`], a single-threaded
//! least-recently-used cache with O(1) `insert`/`get`/eviction, and
//! [`policy::lru::ConcurrentLruCache`] (feature `concurrency`), a
//! cloneable thread-safe handle that serializes all recency-mutating
//! operations behind one lock.
//!
//! Internals live in [`ds`]: a [`ds::SlotArena`] issues stable handles for
//! cache entries, and a [`ds::RecencyList`] links those handles into
//! MRU-to-LRU order. No raw pointers are involved, so eviction and
//! teardown are ordinary ownership.
//!
//! ## Features
//!
//! - `concurrency` (default): `parking_lot`-backed `ConcurrentLruCache`.
//! - `metrics`: per-cache operation counters, see [`metrics`].
//!
//! ## Quick start
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get(&"a");      // "b" is now the eviction victim
//! cache.insert("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! ```

pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;

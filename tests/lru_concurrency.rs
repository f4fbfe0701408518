// ==============================================
// CONCURRENT LRU CACHE TESTS (integration)
// ==============================================
//
// Multi-threaded exercises of ConcurrentLruCache. Each public operation
// runs entirely under the cache's lock, so concurrent mixes of get/insert
// must preserve the capacity bound and every structural invariant. These
// need real threads and cannot live inline.

#![cfg(feature = "concurrency")]

use std::sync::{Arc, Barrier};
use std::thread;

use lrukit::policy::lru::ConcurrentLruCache;

#[test]
fn concurrent_inserts_respect_the_capacity_bound() {
    let capacity = 32;
    let threads = 8;
    let cache: ConcurrentLruCache<u64, u64> = ConcurrentLruCache::new(capacity);
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..500u64 {
                    cache.insert(t * 1_000 + i, i);
                    assert!(cache.len() <= capacity);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), capacity);
    assert_eq!(cache.capacity(), capacity);
}

#[test]
fn mixed_readers_and_writers_never_observe_a_torn_state() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(16);
    for k in 0..16u32 {
        cache.insert(k, k * 10);
    }

    let barrier = Arc::new(Barrier::new(4));
    let mut handles = Vec::new();

    // Two writer threads churning overlapping key ranges.
    for t in 0..2u32 {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..2_000u32 {
                cache.insert((t * 8 + i) % 48, i);
            }
        }));
    }

    // Two reader threads: every hit must see a value some insert wrote.
    for _ in 0..2 {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..2_000u32 {
                if let Some(value) = cache.get(&(i % 48)) {
                    // Seed values are k * 10, writer values are 0..2000.
                    assert!(*value < 2_000);
                }
                let snapshot = cache.snapshot();
                assert!(snapshot.len() <= 16);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(cache.len() <= 16);
}

#[test]
fn value_handles_outlive_concurrent_eviction() {
    let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(4);
    for k in 0..4u32 {
        cache.insert(k, format!("value-{k}"));
    }

    // Grab handles, then let another thread evict everything.
    let held: Vec<_> = (0..4u32).filter_map(|k| cache.get(&k)).collect();

    let evictor = {
        let cache = cache.clone();
        thread::spawn(move || {
            for k in 100..200u32 {
                cache.insert(k, format!("evictor-{k}"));
            }
        })
    };
    evictor.join().unwrap();

    for (k, value) in held.iter().enumerate() {
        assert_eq!(**value, format!("value-{k}"));
    }
    assert!(cache.get(&0).is_none());
}

#[test]
fn touch_from_one_thread_protects_a_key_from_another() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(8);
    for k in 0..8u32 {
        cache.insert(k, k);
    }

    let toucher = {
        let cache = cache.clone();
        thread::spawn(move || {
            for _ in 0..5_000 {
                cache.touch(&0);
            }
        })
    };
    let writer = {
        let cache = cache.clone();
        thread::spawn(move || {
            for k in 1_000..1_500u32 {
                cache.insert(k, k);
            }
        })
    };

    toucher.join().unwrap();
    writer.join().unwrap();

    // The writer inserted far more keys than the capacity, yet the cache
    // never exceeded its bound.
    assert!(cache.len() <= 8);
}

// peek takes only the read lock, so several threads can bump peek_calls
// at the same instant. Every increment must still land.
#[cfg(feature = "metrics")]
#[test]
fn concurrent_peeks_lose_no_counter_increments() {
    let threads = 8;
    let peeks_per_thread = 50_000u64;
    let cache: ConcurrentLruCache<u64, u64> = ConcurrentLruCache::new(4);
    for k in 0..4u64 {
        cache.insert(k, k);
    }

    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..peeks_per_thread {
                    cache.peek(&((t + i) % 4));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = cache.metrics_snapshot();
    assert_eq!(snapshot.peek_calls, threads as u64 * peeks_per_thread);
}

#[test]
fn clones_are_handles_to_one_cache() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    let clone = cache.clone();

    let writer = thread::spawn(move || {
        for k in 0..4u32 {
            clone.insert(k, k + 100);
        }
    });
    writer.join().unwrap();

    for k in 0..4u32 {
        assert_eq!(cache.peek(&k).map(|v| *v), Some(k + 100));
    }
}

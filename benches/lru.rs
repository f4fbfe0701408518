use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lrukit::policy::lru::LruCache;

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_hit_heavy(c: &mut Criterion) {
    c.bench_function("lru_hit_heavy", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(256);
                for i in 0..256u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i % 256)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || LruCache::new(128),
            |mut cache| {
                // Every insert past warm-up evicts; stresses slot reuse.
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(i), i);
                }
                std::hint::black_box(cache.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_pop_lru(c: &mut Criterion) {
    c.bench_function("lru_pop_lru", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                while let Some(entry) = cache.pop_lru() {
                    std::hint::black_box(entry);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_hit_heavy,
    bench_lru_eviction_churn,
    bench_lru_pop_lru
);
criterion_main!(benches);

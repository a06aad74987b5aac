#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use std::sync::atomic::AtomicUsize;
use std::sync::Barrier;

use mold_ir::{ExprBuilder, Lambda, Type, Value};
use mold_shape::key_and_values;
use pretty_assertions::assert_eq;
use rayon::prelude::*;

use super::*;

/// `|x: int| x + k`
fn plus(k: i64) -> Lambda {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let k = b.int(k);
    let root = b.add(x, k);
    b.finish(root)
}

/// `|x: int| x * k`
fn times(k: i64) -> Lambda {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let k = b.int(k);
    let root = b.mul(x, k);
    b.finish(root)
}

fn key_of(expr: &Lambda) -> CanonicalKey {
    key_and_values(expr).unwrap().0
}

fn lower_plus() -> Result<Artifact, String> {
    let skeleton = mold_shape::extract(&plus(0)).unwrap().skeleton;
    mold_eval::lower(&skeleton, 1).map_err(|err| err.to_string())
}

#[test]
fn miss_compiles_then_hit_reuses() {
    let cache = CompilationCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_compile(key_of(&plus(5)), lower_plus).unwrap();
    let second = cache
        .get_or_compile(key_of(&plus(7)), || -> Result<Artifact, String> {
            panic!("hit must not compile")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        cache.stats(),
        CacheStats {
            entries: 1,
            hits: 1,
            compiles: 1,
            races_lost: 0,
        }
    );
}

#[test]
fn distinct_shapes_get_distinct_entries() {
    let cache = CompilationCache::new();
    cache.get_or_compile(key_of(&plus(1)), lower_plus).unwrap();
    cache
        .get_or_compile(key_of(&times(1)), || {
            let skeleton = mold_shape::extract(&times(0)).unwrap().skeleton;
            mold_eval::lower(&skeleton, 1).map_err(|err| err.to_string())
        })
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&key_of(&plus(99))).is_some());
    assert!(cache.get(&key_of(&times(99))).is_some());
}

#[test]
fn failed_compile_inserts_nothing() {
    let cache = CompilationCache::new();
    let key = key_of(&plus(5));

    let err = cache
        .get_or_compile(key.clone(), || Err::<Artifact, _>("backend refused"))
        .unwrap_err();
    assert_eq!(err, "backend refused");
    assert!(cache.is_empty());

    // A later request compiles again and succeeds.
    cache.get_or_compile(key.clone(), lower_plus).unwrap();
    assert!(cache.contains(&key));
    assert_eq!(cache.stats().compiles, 2);
}

#[test]
fn contains_leaves_stats_untouched() {
    let cache = CompilationCache::new();
    let key = key_of(&plus(5));
    assert!(!cache.contains(&key));

    cache.get_or_compile(key.clone(), lower_plus).unwrap();
    let before = cache.stats();
    assert!(cache.contains(&key));
    assert!(cache.contains(&CanonicalKey::probe(&plus(1_000))));
    assert_eq!(cache.stats(), before);
}

#[test]
fn concurrent_misses_publish_one_artifact() {
    const THREADS: usize = 8;
    let cache = CompilationCache::new();
    let barrier = Barrier::new(THREADS);
    let lowered = AtomicUsize::new(0);

    let artifacts: Vec<Arc<Artifact>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let (cache, barrier, lowered) = (&cache, &barrier, &lowered);
                scope.spawn(move || {
                    let key = key_of(&plus(i64::try_from(i).unwrap()));
                    barrier.wait();
                    cache
                        .get_or_compile(key, || {
                            lowered.fetch_add(1, Ordering::Relaxed);
                            lower_plus()
                        })
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    let published = cache.get(&key_of(&plus(0))).unwrap();
    assert!(artifacts.iter().all(|a| Arc::ptr_eq(a, &published)));

    let stats = cache.stats();
    assert_eq!(stats.compiles, u64::try_from(lowered.load(Ordering::Relaxed)).unwrap());
    assert_eq!(stats.races_lost + 1, stats.compiles);
}

#[test]
fn parallel_lookups_keep_values_separate() {
    let cache = CompilationCache::new();

    let results: Vec<(i64, Value)> = (0..64_i64)
        .into_par_iter()
        .map(|k| {
            let expr = plus(k);
            let (key, values) = key_and_values(&expr).unwrap();
            let artifact = cache.get_or_compile(key, lower_plus).unwrap();
            let mut flat = values;
            flat.push(Value::Int(1_000));
            (k, artifact.call(&flat).unwrap())
        })
        .collect();

    assert_eq!(cache.len(), 1);
    for (k, value) in results {
        assert_eq!(value, Value::Int(1_000 + k));
    }
}

#[test]
fn global_is_a_singleton() {
    assert!(Arc::ptr_eq(
        &CompilationCache::global(),
        &CompilationCache::global()
    ));
}

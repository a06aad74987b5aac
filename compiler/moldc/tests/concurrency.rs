#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

//! Many threads compiling expressions of one shape.

use std::sync::Barrier;

use moldc::{ExprBuilder, ExprCompiler, Lambda, Type, Value};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

/// `|x: int| x * 2 + k`
fn scaled_plus(k: i64) -> Lambda {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let two = b.int(2);
    let doubled = b.mul(x, two);
    let k = b.int(k);
    let root = b.add(doubled, k);
    b.finish(root)
}

/// `|s: str| prefix + s`
fn prefixed(prefix: &str) -> Lambda {
    let mut b = ExprBuilder::new();
    let s = b.param("s", Type::Str);
    let prefix = b.str(prefix);
    let root = b.add(prefix, s);
    b.finish(root)
}

#[test]
fn racing_threads_publish_one_entry() {
    const THREADS: i64 = 16;
    let compiler = ExprCompiler::isolated();
    let barrier = Barrier::new(usize::try_from(THREADS).unwrap());

    let results: Vec<(i64, Value)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|k| {
                let (compiler, barrier) = (&compiler, &barrier);
                scope.spawn(move || {
                    let expr = scaled_plus(k);
                    barrier.wait();
                    let f = compiler.compile(&expr).unwrap();
                    (k, f.call(&[Value::Int(3)]).unwrap())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(compiler.cache().len(), 1);
    for (k, value) in results {
        assert_eq!(value, Value::Int(6 + k), "constant {k} bled into another call");
    }

    let stats = compiler.cache_stats();
    assert_eq!(stats.races_lost + 1, stats.compiles);
}

#[test]
fn compiled_functions_are_shared_across_threads() {
    let compiler = ExprCompiler::isolated();
    let fns: Vec<_> = (0..8)
        .map(|k| compiler.compile(&scaled_plus(k)).unwrap())
        .collect();

    let sums: Vec<i64> = (0..1_000_i64)
        .into_par_iter()
        .map(|x| {
            let k = usize::try_from(x % 8).unwrap();
            fns[k]
                .call(&[Value::Int(x)])
                .unwrap()
                .as_int()
                .unwrap()
        })
        .collect();

    for (x, sum) in (0..1_000_i64).zip(sums) {
        assert_eq!(sum, x * 2 + x % 8);
    }
}

#[test]
fn parallel_shapes_and_constants() {
    let compiler = ExprCompiler::isolated();

    (0..200_i64).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            let value = compiler
                .evaluate(&scaled_plus(i), &[Value::Int(1)])
                .unwrap();
            assert_eq!(value, Value::Int(2 + i));
        } else {
            let prefix = format!("{i}:");
            let value = compiler
                .evaluate(&prefixed(&prefix), &[Value::str("x")])
                .unwrap();
            assert_eq!(value, Value::str(&format!("{i}:x")));
        }
    });

    assert_eq!(compiler.cache().len(), 2);
}

#[test]
fn global_front_door_from_many_threads() {
    // Only this test builds `|s: str| prefix + s` against the global cache.
    (0..32).into_par_iter().for_each(|i| {
        let prefix = format!("#{i} ");
        let value = moldc::evaluate(&prefixed(&prefix), &[Value::str("ok")]).unwrap();
        assert_eq!(value, Value::str(&format!("#{i} ok")));
    });

    assert!(moldc::is_cached(&prefixed("anything")));
}

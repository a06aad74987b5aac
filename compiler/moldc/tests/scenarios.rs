#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

//! End-to-end compile-and-call scenarios.
//!
//! Tests that go through the global compiler use shapes no other test in
//! this binary builds, since the global cache is shared by every test thread.
//! Tests that count lowerings use an isolated compiler.
//!
//! ```bash
//! cargo test -p moldc --test scenarios
//! ```

use std::sync::Arc;

use moldc::{
    BinaryOp, Builtin, CompilationCache, ClosureBackend, Error, EvalErrorKind, ExprArena,
    ExprBuilder, ExprCompiler, ExprKind, ExtractError, Lambda, Type, Value,
};
use pretty_assertions::assert_eq;

fn isolated() -> ExprCompiler {
    ExprCompiler::with_cache(Arc::new(CompilationCache::new()), Arc::new(ClosureBackend))
}

/// `|x: int| x + k`
fn plus(k: i64) -> Lambda {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let k = b.int(k);
    let root = b.add(x, k);
    b.finish(root)
}

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

/// `|name: str| greeting + name + "!"`
fn greet(greeting: &str) -> Lambda {
    let mut b = ExprBuilder::new();
    let name = b.param("name", Type::Str);
    let greeting = b.str(greeting);
    let bang = b.str("!");
    let head = b.add(greeting, name);
    let root = b.add(head, bang);
    b.finish(root)
}

#[test]
fn differing_constants_share_one_lowering() {
    let compiler = isolated();

    compiler.compile(&plus(5)).unwrap();
    assert!(compiler.is_cached(&plus(7)));
    compiler.compile(&plus(7)).unwrap();

    let stats = compiler.cache_stats();
    assert_eq!(stats.compiles, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn global_cache_sees_shape_after_first_compile() {
    // Only this test builds `|b: bool| b == k`.
    let flag_is = |k: bool| {
        let mut b = ExprBuilder::new();
        let flag = b.param("b", Type::Bool);
        let k = b.bool(k);
        let root = b.eq(flag, k);
        b.finish(root)
    };

    assert!(!moldc::is_cached(&flag_is(true)));
    let f = moldc::compile(&flag_is(true)).unwrap();
    assert!(moldc::is_cached(&flag_is(false)));
    assert_eq!(
        moldc::evaluate(&flag_is(false), &[Value::Bool(false)]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(f.call(&[Value::Bool(false)]).unwrap(), Value::Bool(false));
    assert!(moldc::cache_stats().entries >= 1);
}

#[test]
fn same_shape_keeps_each_expressions_constants() {
    let compiler = isolated();

    let ten = compiler.compile(&scaled_plus(10)).unwrap();
    let hundred = compiler.compile(&scaled_plus(100)).unwrap();

    assert_eq!(ten.call(&[Value::Int(3)]).unwrap(), Value::Int(16));
    assert_eq!(hundred.call(&[Value::Int(3)]).unwrap(), Value::Int(106));
    assert!(ten.shares_artifact_with(&hundred));
    assert_eq!(compiler.cache_stats().compiles, 1);
    assert_eq!(compiler.cache().len(), 1);
}

#[test]
fn entries_track_shapes_not_constant_sets() {
    let compiler = isolated();
    let shapes: [fn(i64) -> Lambda; 3] = [plus, scaled_plus, |k| greet(&k.to_string())];
    let rounds = 7;

    for round in 0..rounds {
        for shape in shapes {
            compiler.compile(&shape(round)).unwrap();
        }
    }

    assert_eq!(compiler.cache().len(), shapes.len());
    assert_eq!(compiler.cache_stats().compiles, 3);
}

#[test]
fn strings_and_lists() {
    let compiler = isolated();
    assert_eq!(
        compiler
            .evaluate(&greet("hello "), &[Value::str("mold")])
            .unwrap(),
        Value::str("hello mold!")
    );
    assert_eq!(
        compiler
            .evaluate(&greet("bye "), &[Value::str("mold")])
            .unwrap(),
        Value::str("bye mold!")
    );

    // |xs: [int]| len(xs) + xs[1]
    let mut b = ExprBuilder::new();
    let xs = b.param("xs", Type::list(Type::Int));
    let len = b.call(Builtin::Len, &[xs]);
    let xs_again = b.param_ref(0);
    let one = b.int(1);
    let second = b.index(xs_again, one);
    let root = b.add(len, second);
    let expr = b.finish(root);

    let list = Value::list(Type::Int, vec![Value::Int(4), Value::Int(40)]);
    assert_eq!(compiler.evaluate(&expr, &[list]).unwrap(), Value::Int(42));
}

#[test]
fn let_bindings_and_branches() {
    let compiler = isolated();
    // |x: float| let y = x * 0.5 in if y < 1.0 then 1.0 else y
    let clamp = |scale: f64, floor: f64| {
        let mut b = ExprBuilder::new();
        let x = b.param("x", Type::Float);
        let scale = b.float(scale);
        let init = b.mul(x, scale);
        let root = b.let_in(init, |b, y| {
            let floor_a = b.float(floor);
            let below = b.lt(y, floor_a);
            let floor_b = b.float(floor);
            b.if_else(below, floor_b, y)
        });
        b.finish(root)
    };

    let f = compiler.compile(&clamp(0.5, 1.0)).unwrap();
    let g = compiler.compile(&clamp(2.0, 0.0)).unwrap();
    assert_eq!(f.call(&[Value::Float(1.0)]).unwrap(), Value::Float(1.0));
    assert_eq!(f.call(&[Value::Float(8.0)]).unwrap(), Value::Float(4.0));
    assert_eq!(g.call(&[Value::Float(-3.0)]).unwrap(), Value::Float(0.0));
    assert!(f.shares_artifact_with(&g));
}

#[test]
fn wrong_argument_count_is_rejected_before_running() {
    let f = isolated().compile(&plus(1)).unwrap();

    assert_eq!(
        f.call(&[Value::Int(1), Value::Int(2)]).unwrap_err(),
        Error::ArityMismatch {
            expected: 1,
            got: 2
        }
    );
    assert_eq!(f.call(&[Value::Int(1)]).unwrap(), Value::Int(2));
}

#[test]
fn runtime_failure_is_passed_through() {
    // |x: int| k / x
    let ratio = |k: i64| {
        let mut b = ExprBuilder::new();
        let x = b.param("x", Type::Int);
        let k = b.int(k);
        let root = b.binary(BinaryOp::Div, k, x);
        b.finish(root)
    };
    let compiler = isolated();

    assert_eq!(
        compiler.evaluate(&ratio(10), &[Value::Int(5)]).unwrap(),
        Value::Int(2)
    );
    match compiler.evaluate(&ratio(10), &[Value::Int(0)]).unwrap_err() {
        Error::Evaluation(err) => assert_eq!(err.kind, EvalErrorKind::DivisionByZero),
        other => panic!("expected an evaluation failure, got {other:?}"),
    }
}

#[test]
fn rejected_shape_is_retried_not_remembered() {
    // |s: str| -s
    let negate = || {
        let mut b = ExprBuilder::new();
        let s = b.param("s", Type::Str);
        let root = b.neg(s);
        b.finish(root)
    };
    let compiler = isolated();

    assert!(matches!(
        compiler.compile(&negate()),
        Err(Error::Compile(_))
    ));
    assert!(matches!(
        compiler.compile(&negate()),
        Err(Error::Compile(_))
    ));
    let stats = compiler.cache_stats();
    assert_eq!(stats.compiles, 2);
    assert_eq!(stats.entries, 0);
}

#[test]
fn malformed_tree_is_reported() {
    let mut arena = ExprArena::new();
    let root = arena.push(ExprKind::Local(0), Type::Int);
    let expr = Lambda::new(Vec::new(), arena, root);
    let compiler = isolated();

    assert!(matches!(
        compiler.compile(&expr),
        Err(Error::Extract(ExtractError::UnboundLocal { slot: 0, .. }))
    ));
    assert!(!compiler.is_cached(&expr));
    assert!(compiler.cache().is_empty());
}

#[test]
fn deep_chain_compiles_runs_and_drops() {
    // |x: int| x + 1 + 1 + ... + 1
    let mut b = ExprBuilder::new();
    let mut acc = b.param("x", Type::Int);
    for _ in 0..200_000 {
        let one = b.int(1);
        acc = b.add(acc, one);
    }
    let expr = b.finish(acc);

    let compiler = ExprCompiler::isolated();
    let f = compiler.compile(&expr).unwrap();
    assert_eq!(f.call(&[Value::Int(0)]).unwrap(), Value::Int(200_000));
    assert_eq!(f.values().len(), 200_000);

    drop(f);
    drop(compiler);
}

#[test]
fn typed_wrapper() {
    let compiler = isolated();
    let f = compiler
        .compile_typed::<(String,), String>(&greet("hi "))
        .unwrap();
    assert_eq!(f.call(("there".to_string(),)).unwrap(), "hi there!");

    assert!(matches!(
        compiler.compile_typed::<(i64,), String>(&greet("hi ")),
        Err(Error::SignatureMismatch { .. })
    ));
}

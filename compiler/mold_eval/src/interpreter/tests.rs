#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use mold_ir::{Builtin, ExprBuilder, Type};
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;

#[test]
fn affine() {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let two = b.int(2);
    let doubled = b.mul(x, two);
    let ten = b.int(10);
    let root = b.add(doubled, ten);
    let lambda = b.finish(root);

    assert_eq!(interpret(&lambda, &[Value::Int(3)]).unwrap(), Value::Int(16));
}

#[test]
fn short_circuit_skips_failing_operand() {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let zero = b.int(0);
    let nonzero = b.binary(BinaryOp::NotEq, x, zero);
    let one = b.int(1);
    let quotient = b.binary(BinaryOp::Div, one, x);
    let positive = b.binary(BinaryOp::Gt, quotient, zero);
    let root = b.binary(BinaryOp::And, nonzero, positive);
    let lambda = b.finish(root);

    assert_eq!(
        interpret(&lambda, &[Value::Int(0)]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        interpret(&lambda, &[Value::Int(1)]).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn shadowed_let_reads_innermost() {
    let mut arena = ExprArena::new();
    let one = arena.push(ExprKind::Const(Value::Int(1)), Type::Int);
    let two = arena.push(ExprKind::Const(Value::Int(2)), Type::Int);
    let inner_ref = arena.push(ExprKind::Local(0), Type::Int);
    let inner = arena.push(
        ExprKind::Let {
            slot: 0,
            init: two,
            body: inner_ref,
        },
        Type::Int,
    );
    let outer_ref = arena.push(ExprKind::Local(0), Type::Int);
    let sum = arena.push(
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: inner,
            right: outer_ref,
        },
        Type::Int,
    );
    let root = arena.push(
        ExprKind::Let {
            slot: 0,
            init: one,
            body: sum,
        },
        Type::Int,
    );
    let lambda = Lambda::new(Vec::new(), arena, root);

    // inner let yields 2, then the outer binding (1) is visible again.
    assert_eq!(interpret(&lambda, &[]).unwrap(), Value::Int(3));
}

#[test]
fn lists_index_and_builtins() {
    let mut b = ExprBuilder::new();
    let xs = b.param("xs", Type::list(Type::Int));
    let root = b.let_in(xs, |b, xs| {
        let n = b.call(Builtin::Len, &[xs]);
        let one = b.int(1);
        let last = b.sub(n, one);
        let item = b.index(xs, last);
        let extra = b.int(5);
        let both = b.list(Type::Int, &[item, extra]);
        let combined = b.add(xs, both);
        b.call(Builtin::Len, &[combined])
    });
    let lambda = b.finish(root);

    let xs = Value::list(Type::Int, vec![Value::Int(4), Value::Int(9)]);
    assert_eq!(interpret(&lambda, &[xs]).unwrap(), Value::Int(4));

    let empty = Value::list(Type::Int, Vec::new());
    assert_eq!(
        interpret(&lambda, &[empty]).unwrap_err().kind,
        EvalErrorKind::IndexOutOfBounds { index: -1, len: 0 }
    );
}

#[test]
fn if_selects_branch() {
    let mut b = ExprBuilder::new();
    let s = b.param("s", Type::Str);
    let empty = b.str("");
    let is_empty = b.eq(s, empty);
    let fallback = b.str("anonymous");
    let s_again = b.param_ref(0);
    let root = b.if_else(is_empty, fallback, s_again);
    let lambda = b.finish(root);

    assert_eq!(
        interpret(&lambda, &[Value::str("")]).unwrap(),
        Value::str("anonymous")
    );
    assert_eq!(
        interpret(&lambda, &[Value::str("ada")]).unwrap(),
        Value::str("ada")
    );
}

#[test]
fn arguments_checked() {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Float);
    let root = b.neg(x);
    let lambda = b.finish(root);

    assert_eq!(
        interpret(&lambda, &[]).unwrap_err().kind,
        EvalErrorKind::ArityMismatch {
            name: String::new(),
            expected: 1,
            got: 0
        }
    );
    assert_eq!(
        interpret(&lambda, &[Value::Int(1)]).unwrap_err().kind,
        EvalErrorKind::TypeMismatch {
            expected: "float".to_string(),
            got: "int".to_string()
        }
    );
}

#[test]
fn list_node_with_non_list_type_is_rejected() {
    let mut arena = ExprArena::new();
    let one = arena.push(ExprKind::Const(Value::Int(1)), Type::Int);
    let items = arena.push_list(&[one]);
    let root = arena.push(ExprKind::List(items), Type::Int);
    let lambda = Lambda::new(Vec::new(), arena, root);

    assert_eq!(
        interpret(&lambda, &[]).unwrap_err().kind,
        EvalErrorKind::TypeMismatch {
            expected: "[int]".to_string(),
            got: "int".to_string()
        }
    );
    assert!(crate::lower(&lambda, 0).is_err());
}

#[test]
fn evaluation_errors_surface() {
    let mut b = ExprBuilder::new();
    let x = b.param("x", Type::Int);
    let y = b.param("y", Type::Int);
    let root = b.binary(BinaryOp::Mod, x, y);
    let lambda = b.finish(root);

    assert_eq!(
        interpret(&lambda, &[Value::Int(1), Value::Int(0)])
            .unwrap_err()
            .kind,
        EvalErrorKind::ModuloByZero
    );
}

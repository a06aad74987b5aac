#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use mold_ir::{ExprBuilder, Type};
use mold_shape::{extract, Extracted};
use pretty_assertions::assert_eq;

use super::*;

/// `|x: str| x + s0 + s1 + ... + s(n-1)`, extracted and lowered.
fn joined(parts: &[&str]) -> (Artifact, Vec<Value>) {
    let mut b = ExprBuilder::new();
    let mut acc = b.param("x", Type::Str);
    for part in parts {
        let part = b.str(part);
        acc = b.add(acc, part);
    }
    let Extracted { skeleton, values } = extract(&b.finish(acc)).unwrap();
    (mold_eval::lower(&skeleton, 1).unwrap(), values)
}

#[test]
fn values_come_before_arguments() {
    let (artifact, values) = joined(&["b", "c"]);
    assert_eq!(
        invoke(&artifact, &values, &[Value::str("a")], 1).unwrap(),
        Value::str("abc")
    );
}

#[test]
fn more_values_than_fit_inline() {
    let parts = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];
    let (artifact, values) = joined(&parts);
    assert_eq!(values.len(), parts.len());

    assert_eq!(
        invoke(&artifact, &values, &[Value::str(">")], 1).unwrap(),
        Value::str(">123456789101112")
    );
}

#[test]
fn argument_count_checked_first() {
    let (artifact, values) = joined(&["!"]);
    assert_eq!(
        invoke(&artifact, &values, &[], 1).unwrap_err(),
        Error::ArityMismatch {
            expected: 1,
            got: 0
        }
    );
}

#[test]
fn runtime_errors_pass_through() {
    let (artifact, values) = joined(&["!"]);
    assert!(matches!(
        invoke(&artifact, &values, &[Value::Int(1)], 1),
        Err(Error::Evaluation(_))
    ));
}

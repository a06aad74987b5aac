//! Builtin functions and list indexing.

use mold_ir::{Builtin, Type, Value};

use crate::errors::{
    float_to_int_out_of_range, index_out_of_bounds, integer_overflow, invalid_builtin_argument,
    type_mismatch, wrong_arg_count, EvalResult,
};

/// Call `func` on already evaluated arguments.
pub fn call_builtin(func: Builtin, args: &[Value]) -> EvalResult {
    if args.len() != func.arity() {
        return Err(wrong_arg_count(func.name(), func.arity(), args.len()));
    }
    match (func, args) {
        (Builtin::Abs, [Value::Int(n)]) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("abs")),
        (Builtin::Abs, [Value::Float(x)]) => Ok(Value::Float(x.abs())),

        (Builtin::Min | Builtin::Max, [a, b]) => min_max(func, a, b),

        (Builtin::Len, [Value::List(list)]) => len_to_int(list.len()),
        (Builtin::Len, [Value::Str(s)]) => len_to_int(s.chars().count()),

        (Builtin::ToFloat, [Value::Int(n)]) => Ok(Value::Float(int_to_float(*n))),
        (Builtin::ToInt, [Value::Float(x)]) => float_to_int(*x),

        (func, [first, ..]) => Err(invalid_builtin_argument(func, first.type_name())),
        (func, []) => Err(wrong_arg_count(func.name(), func.arity(), 0)),
    }
}

fn min_max(func: Builtin, a: &Value, b: &Value) -> EvalResult {
    let take_first = match (a, b) {
        (Value::Int(x), Value::Int(y)) => (x <= y) == (func == Builtin::Min),
        // NaN propagates from either side, as `f64::min` does not.
        (Value::Float(x), Value::Float(_)) if x.is_nan() => true,
        (Value::Float(_), Value::Float(y)) if y.is_nan() => false,
        (Value::Float(x), Value::Float(y)) => (x <= y) == (func == Builtin::Min),
        (Value::Str(x), Value::Str(y)) => (x <= y) == (func == Builtin::Min),
        _ => return Err(invalid_builtin_argument(func, a.type_name())),
    };
    Ok(if take_first { a.clone() } else { b.clone() })
}

fn len_to_int(len: usize) -> EvalResult {
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| integer_overflow("len"))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "to_float is a lossy conversion by definition"
)]
fn int_to_float(n: i64) -> f64 {
    n as f64
}

/// Truncate toward zero; fails for NaN, infinities and out-of-range values.
#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
fn float_to_int(x: f64) -> EvalResult {
    // 2^63 is exactly representable.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.is_finite() && x >= -LIMIT && x < LIMIT {
        Ok(Value::Int(x.trunc() as i64))
    } else {
        Err(float_to_int_out_of_range(x))
    }
}

/// `receiver[index]` for a list receiver.
pub fn index_value(receiver: &Value, index: &Value) -> EvalResult {
    match (receiver, index) {
        (Value::List(list), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|at| list.items().get(at))
            .cloned()
            .ok_or_else(|| index_out_of_bounds(*i, list.len())),
        (Value::List(_), other) => Err(type_mismatch(&Type::Int, &other.ty())),
        (other, _) => Err(type_mismatch(&Type::list(index.ty()), &other.ty())),
    }
}

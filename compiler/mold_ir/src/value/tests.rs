use super::*;

#[test]
fn float_equality_is_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_eq!(Value::Float(1.5), Value::Float(1.5));
}

#[test]
fn values_of_different_types_are_unequal() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Bool(false), Value::Int(0));
}

#[test]
fn empty_list_keeps_element_type() {
    let empty = Value::list(Type::Int, Vec::new());
    assert_eq!(empty.ty(), Type::list(Type::Int));
    assert_ne!(empty, Value::list(Type::Str, Vec::new()));
}

#[test]
fn default_values_have_their_type() {
    for ty in [
        Type::Int,
        Type::Float,
        Type::Bool,
        Type::Str,
        Type::Unit,
        Type::list(Type::list(Type::Float)),
    ] {
        assert_eq!(ty.default_value().ty(), ty);
    }
}

#[test]
fn display() {
    let list = Value::list(Type::Int, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(list.to_string(), "[1, 2]");
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::str("hi").to_string(), "\"hi\"");
    assert_eq!(Value::Unit.to_string(), "()");
}

#[test]
fn has_type_agrees_with_ty() {
    let values = [
        Value::Int(1),
        Value::Float(1.0),
        Value::Bool(true),
        Value::str("s"),
        Value::Unit,
        Value::list(Type::list(Type::Int), Vec::new()),
    ];
    let types = values.iter().map(Value::ty).collect::<Vec<_>>();
    for value in &values {
        for ty in &types {
            assert_eq!(value.has_type(ty), value.ty() == *ty, "{value} : {ty}");
        }
    }
}

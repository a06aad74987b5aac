//! Static types of expression nodes.

use std::fmt;

use crate::value::Value;

/// The static type of an expression node, parameter, or constant.
///
/// The type set is closed. Every type has a default value (see
/// [`Type::default_value`]), which is what a canonical cache key stores in
/// place of an extracted constant.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Unit,
    /// Homogeneous list: `[T]`
    List(Box<Type>),
}

impl Type {
    /// Build a list type `[elem]`.
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    /// The zero/default value of this type.
    ///
    /// `0`, `0.0`, `false`, `""`, `()` and `[]` respectively.
    pub fn default_value(&self) -> Value {
        match self {
            Type::Int => Value::Int(0),
            Type::Float => Value::Float(0.0),
            Type::Bool => Value::Bool(false),
            Type::Str => Value::str(""),
            Type::Unit => Value::Unit,
            Type::List(elem) => Value::list((**elem).clone(), Vec::new()),
        }
    }

    /// Element type, if this is a list type.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::List(elem) => Some(elem),
            _ => None,
        }
    }

    /// Returns `true` for `int` and `float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Returns `true` for types with a total order (`int`, `float`, `str`).
    pub fn is_ordered(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Str)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::Unit => write!(f, "unit"),
            Type::List(elem) => write!(f, "[{elem}]"),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

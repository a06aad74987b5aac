//! Operators and builtin functions.

use crate::types::Type;

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical (short-circuit)
    And,
    Or,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    /// `==` and `!=`, defined on every type.
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }

    /// `<`, `<=`, `>`, `>=`, defined on ordered types.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Result type given the left operand's type.
    pub fn result_type(self, left: &Type) -> Type {
        if self.is_arithmetic() {
            left.clone()
        } else {
            Type::Bool
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation: `-x`
    Neg,
    /// Logical not: `!x`
    Not,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }

    pub fn result_type(self, operand: &Type) -> Type {
        match self {
            UnaryOp::Neg => operand.clone(),
            UnaryOp::Not => Type::Bool,
        }
    }
}

/// Builtin functions callable from expressions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `abs(int) -> int`, `abs(float) -> float`
    Abs,
    /// `min(T, T) -> T` for ordered `T`
    Min,
    /// `max(T, T) -> T` for ordered `T`
    Max,
    /// `len([T]) -> int`, `len(str) -> int` (in chars)
    Len,
    /// `to_float(int) -> float`
    ToFloat,
    /// `to_int(float) -> int`, truncating toward zero
    ToInt,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Len => "len",
            Builtin::ToFloat => "to_float",
            Builtin::ToInt => "to_int",
        }
    }

    /// Number of arguments the builtin takes.
    pub fn arity(self) -> usize {
        match self {
            Builtin::Min | Builtin::Max => 2,
            Builtin::Abs | Builtin::Len | Builtin::ToFloat | Builtin::ToInt => 1,
        }
    }

    /// Result type given the first argument's type (if any).
    pub fn result_type(self, first_arg: Option<&Type>) -> Type {
        match self {
            Builtin::Abs | Builtin::Min | Builtin::Max => {
                first_arg.cloned().unwrap_or(Type::Int)
            }
            Builtin::Len | Builtin::ToInt => Type::Int,
            Builtin::ToFloat => Type::Float,
        }
    }
}

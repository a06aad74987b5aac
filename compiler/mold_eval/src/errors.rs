//! Runtime evaluation errors.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries typed data for each failure. Factory functions
//! (e.g., `division_by_zero()`) are the public API; they populate both
//! `kind` and `message`.
//!
//! Evaluation errors are data-dependent. The compilation cache never sees
//! them: they are returned to the caller of the compiled function unchanged.

use std::fmt;

use mold_ir::{BinaryOp, Builtin, Type, UnaryOp, Value};

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: &'static str,
    },
    FloatToIntOutOfRange {
        value: String,
    },

    // Type/Operator
    TypeMismatch {
        expected: String,
        got: String,
    },
    InvalidBinaryOp {
        type_name: &'static str,
        op: BinaryOp,
    },
    InvalidUnaryOp {
        type_name: &'static str,
        op: UnaryOp,
    },
    BinaryTypeMismatch {
        left: &'static str,
        right: &'static str,
    },
    InvalidBuiltinArgument {
        func: Builtin,
        type_name: &'static str,
    },

    // Access
    UndefinedVariable {
        name: String,
    },
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },

    // Function
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Arithmetic
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::FloatToIntOutOfRange { value } => {
                write!(f, "float {value} cannot be converted to int")
            }

            // Type/Operator
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { type_name, op } => {
                write!(
                    f,
                    "operator `{}` cannot be applied to {type_name}",
                    op.as_symbol()
                )
            }
            Self::InvalidUnaryOp { type_name, op } => {
                write!(
                    f,
                    "unary `{}` cannot be applied to {type_name}",
                    op.as_symbol()
                )
            }
            Self::BinaryTypeMismatch { left, right } => {
                write!(f, "cannot apply operator to `{left}` and `{right}`")
            }
            Self::InvalidBuiltinArgument { func, type_name } => {
                write!(f, "{} does not accept {type_name}", func.name())
            }

            // Access
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }

            // Function
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                if name.is_empty() {
                    write!(f, "expected {expected} {arg_word}, got {got}")
                } else {
                    write!(f, "{name} expects {expected} {arg_word}, got {got}")
                }
            }
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message; equals `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    /// Create an error from a structured kind.
    ///
    /// The message is computed from the kind's `Display` impl.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Arithmetic Errors

/// Division by zero error.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Modulo by zero error.
#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

/// Integer overflow error.
#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

/// A float that is NaN, infinite, or outside the `i64` range.
#[cold]
pub fn float_to_int_out_of_range(value: f64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FloatToIntOutOfRange {
        value: format!("{value:?}"),
    })
}

// Operator Errors

/// Invalid operator for a specific type.
#[cold]
pub fn invalid_binary_op_for(type_name: &'static str, op: BinaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp { type_name, op })
}

/// Invalid unary operator for a specific type.
#[cold]
pub fn invalid_unary_op_for(type_name: &'static str, op: UnaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp { type_name, op })
}

/// Type mismatch in binary operation.
#[cold]
pub fn binary_type_mismatch(left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch { left, right })
}

/// Builtin applied to a value it does not accept.
#[cold]
pub fn invalid_builtin_argument(func: Builtin, type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBuiltinArgument { func, type_name })
}

/// Value of the wrong static type.
#[cold]
pub fn type_mismatch(expected: &Type, got: &Type) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

// Access Errors

/// Undefined variable.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Index out of bounds.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

// Function Errors

/// Wrong number of arguments.
///
/// `name` may be empty for anonymous callees.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

//! Mold Eval - runtime semantics and lowering for mold expressions.
//!
//! # Architecture
//!
//! - [`evaluate_binary`], [`evaluate_unary`] and [`call_builtin`]: the
//!   value-level semantics of every operator and builtin, shared by both
//!   execution strategies below
//! - [`interpret`]: a reference tree-walker over a [`Lambda`](mold_ir::Lambda)
//! - [`lower`]: compiles a skeleton into an [`Artifact`], a tree of boxed
//!   closures that is `Send + Sync` and can be shared by every expression of
//!   the same shape
//!
//! Lowering type-checks as it goes and fails with [`CompileError`]; running
//! either strategy fails with [`EvalError`].

mod builtins;
mod errors;
mod interpreter;
mod lower;
mod operators;

pub use builtins::{call_builtin, index_value};
pub use errors::{
    binary_type_mismatch, division_by_zero, float_to_int_out_of_range, index_out_of_bounds,
    integer_overflow, invalid_binary_op_for, invalid_builtin_argument, invalid_unary_op_for,
    modulo_by_zero, type_mismatch, undefined_variable, wrong_arg_count, EvalError, EvalErrorKind,
    EvalResult,
};
pub use interpreter::interpret;
pub use lower::{lower, Artifact, CompileError, CompileErrorKind};
pub use operators::{evaluate_binary, evaluate_unary};

//! The error type of the compile-and-call front door.

use mold_eval::{CompileError, EvalError};
use mold_shape::ExtractError;

/// Everything `compile`, `evaluate` and compiled functions can fail with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The expression tree is malformed. Nothing was cached.
    #[error("malformed expression: {0}")]
    Extract(#[from] ExtractError),

    /// Lowering rejected the expression's shape. Nothing was cached; a later
    /// request for the same shape lowers again.
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// A compiled function was called with the wrong number of arguments.
    /// Raised before the artifact runs.
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// The compiled code failed at runtime. Passed through unchanged.
    #[error(transparent)]
    Evaluation(#[from] EvalError),

    /// A typed wrapper's Rust signature does not match the expression.
    #[error("signature mismatch: expected {expected}, found {found}")]
    SignatureMismatch { expected: String, found: String },
}

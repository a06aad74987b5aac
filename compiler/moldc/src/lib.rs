//! Mold - a memoizing compiler for parameterized expressions.
//!
//! Expressions are built with [`ExprBuilder`] and compiled through a
//! process-wide cache keyed by shape: expressions that differ only in their
//! constants are lowered once and share the compiled code.
//!
//! The free functions here all go through [`ExprCompiler::global`]. Use
//! [`ExprCompiler::with_cache`] for an isolated cache or a custom
//! [`Backend`].
//!
//! # Logging
//!
//! Call [`init_tracing`] once at startup and set `RUST_LOG`, e.g.
//! `RUST_LOG=mold_cache=debug` to see each new shape as it is compiled.
//! `MOLD_LOG_TREE=1` prints spans as an indented tree.

mod tracing_setup;

pub use mold_cache::{
    invoke, Args, Backend, CacheStats, ClosureBackend, CompilationCache, CompiledFn, Error,
    ExprCompiler, FromValue, IntoValue, TypedFn,
};
pub use mold_eval::{interpret, Artifact, CompileError, CompileErrorKind, EvalError, EvalErrorKind};
pub use mold_ir::{
    BinaryOp, Builtin, ExprArena, ExprBuilder, ExprId, ExprKind, Lambda, Param, Type, UnaryOp,
    Value,
};
pub use mold_shape::{extract, extract_values, reinsert, CanonicalKey, ExtractError, Extracted};
pub use tracing_setup::init_tracing;

/// Compile `expr` and call it once with `args`.
pub fn evaluate(expr: &Lambda, args: &[Value]) -> Result<Value, Error> {
    ExprCompiler::global().evaluate(expr, args)
}

/// Compile `expr`, reusing the compiled code of any earlier expression with
/// the same shape.
pub fn compile(expr: &Lambda) -> Result<CompiledFn, Error> {
    ExprCompiler::global().compile(expr)
}

/// Compile `expr` behind the Rust signature `A -> R`.
pub fn compile_typed<A: Args, R: FromValue>(expr: &Lambda) -> Result<TypedFn<A, R>, Error> {
    ExprCompiler::global().compile_typed(expr)
}

/// Whether the global cache already holds compiled code for the shape of
/// `expr`. Side-effect free.
pub fn is_cached(expr: &Lambda) -> bool {
    ExprCompiler::global().is_cached(expr)
}

pub fn cache_stats() -> CacheStats {
    ExprCompiler::global().cache_stats()
}

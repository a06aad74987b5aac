//! Mold Cache - memoized compilation of parameterized expressions.
//!
//! Expressions that differ only in their constants share one compiled
//! artifact. Compiling `|x| x * 2 + 10` and then `|x| x * 2 + 100` lowers
//! once; the second call finds the artifact by shape and pairs it with its
//! own constants `[2, 100]`.
//!
//! # Components
//!
//! - [`CompilationCache`]: concurrent, append-only map from canonical key to
//!   artifact; one process-wide instance via [`CompilationCache::global`]
//! - [`Backend`]: how a skeleton becomes an artifact ([`ClosureBackend`] by
//!   default)
//! - [`invoke`]: calls an artifact with `values ++ arguments`
//! - [`ExprCompiler`]: the front door tying extraction, the cache and the
//!   backend together
//! - [`CompiledFn`] / [`TypedFn`]: what callers hold
//!
//! ```
//! use mold_cache::ExprCompiler;
//! use mold_ir::{ExprBuilder, Type, Value};
//!
//! let scaled = |k: i64| {
//!     let mut b = ExprBuilder::new();
//!     let x = b.param("x", Type::Int);
//!     let two = b.int(2);
//!     let doubled = b.mul(x, two);
//!     let k = b.int(k);
//!     let root = b.add(doubled, k);
//!     b.finish(root)
//! };
//!
//! let compiler = ExprCompiler::isolated();
//! let f = compiler.compile(&scaled(10)).unwrap();
//! let g = compiler.compile(&scaled(100)).unwrap();
//! assert_eq!(f.call(&[Value::Int(3)]).unwrap(), Value::Int(16));
//! assert_eq!(g.call(&[Value::Int(3)]).unwrap(), Value::Int(106));
//! assert!(f.shares_artifact_with(&g));
//! assert_eq!(compiler.cache().len(), 1);
//! ```

mod backend;
mod cache;
mod compiled;
mod compiler;
mod error;
mod invoke;
mod typed;

pub use backend::{Backend, ClosureBackend};
pub use cache::{CacheStats, CompilationCache};
pub use compiled::CompiledFn;
pub use compiler::ExprCompiler;
pub use error::Error;
pub use invoke::invoke;
pub use typed::{Args, FromValue, IntoValue, TypedFn};

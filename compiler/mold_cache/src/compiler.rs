//! The compile-and-call front door.

use std::sync::{Arc, OnceLock};

use mold_ir::{Lambda, Value};
use mold_shape::{canonicalize, extract, key_and_values, Extracted};
use tracing::{debug, trace};

use crate::backend::{Backend, ClosureBackend};
use crate::cache::{CacheStats, CompilationCache};
use crate::compiled::CompiledFn;
use crate::error::Error;
use crate::typed::{Args, FromValue, TypedFn};

/// Global compiler singleton over the global cache.
static GLOBAL_COMPILER: OnceLock<ExprCompiler> = OnceLock::new();

/// Compiles expressions through a [`CompilationCache`].
///
/// # Pipeline
///
/// 1. Validate the expression and collect its constants.
/// 2. Look the shape up by its value-erased key. On a hit, pair the cached
///    artifact with this expression's constants and return.
/// 3. On a miss, extract the skeleton, build the canonical key, and let the
///    cache lower the skeleton through the [`Backend`] (first publisher
///    wins).
#[derive(Clone)]
pub struct ExprCompiler {
    cache: Arc<CompilationCache>,
    backend: Arc<dyn Backend>,
}

impl ExprCompiler {
    /// The process-wide compiler: global cache, closure backend.
    pub fn global() -> &'static ExprCompiler {
        GLOBAL_COMPILER.get_or_init(|| {
            ExprCompiler::with_cache(CompilationCache::global(), Arc::new(ClosureBackend))
        })
    }

    pub fn with_cache(cache: Arc<CompilationCache>, backend: Arc<dyn Backend>) -> Self {
        ExprCompiler { cache, backend }
    }

    /// A compiler over a fresh private cache with the closure backend.
    pub fn isolated() -> Self {
        Self::with_cache(Arc::new(CompilationCache::new()), Arc::new(ClosureBackend))
    }

    pub fn cache(&self) -> &Arc<CompilationCache> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Compile `expr`, reusing the cached artifact of its shape if there is
    /// one.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(nodes = expr.arena().len(), arity = expr.arity())
    )]
    pub fn compile(&self, expr: &Lambda) -> Result<CompiledFn, Error> {
        let (probe, values) = key_and_values(expr)?;
        if let Some(artifact) = self.cache.get(&probe) {
            trace!(shape_hash = probe.shape_hash(), "cache hit");
            return Ok(CompiledFn::new(artifact, values.into()));
        }

        let Extracted { skeleton, .. } = extract(expr)?;
        let key = canonicalize(&skeleton, expr.params());
        debug_assert_eq!(key, probe, "probe and canonical keys disagree");

        let artifact = self.cache.get_or_compile(key, || {
            debug!(shape = %skeleton, "lowering new shape");
            self.backend
                .lower(&skeleton, expr.arity())
                .inspect_err(|err| debug!(%err, "lowering failed"))
        })?;
        Ok(CompiledFn::new(artifact, values.into()))
    }

    /// Compile `expr` and call it once with `args`.
    pub fn evaluate(&self, expr: &Lambda, args: &[Value]) -> Result<Value, Error> {
        self.compile(expr)?.call(args)
    }

    /// Compile `expr` behind a checked Rust signature.
    pub fn compile_typed<A: Args, R: FromValue>(
        &self,
        expr: &Lambda,
    ) -> Result<TypedFn<A, R>, Error> {
        TypedFn::new(self.compile(expr)?)
    }

    /// Whether the shape of `expr` already has a compiled artifact.
    ///
    /// Never compiles and never changes the cache or its statistics.
    /// Malformed expressions are never cached.
    pub fn is_cached(&self, expr: &Lambda) -> bool {
        key_and_values(expr).is_ok_and(|(key, _)| self.cache.contains(&key))
    }
}

impl std::fmt::Debug for ExprCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExprCompiler")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

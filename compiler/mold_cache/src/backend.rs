//! The lowering seam between the cache and code generation.

use mold_eval::{Artifact, CompileError};
use mold_ir::Lambda;

/// Turns skeletons into artifacts.
///
/// Called at most once per cache miss, on the requesting thread, with no
/// cache lock held. Implementations must be pure: the cache may discard the
/// result if another thread publishes first.
pub trait Backend: Send + Sync {
    /// Lower `skeleton`, whose first `original_arity` parameters are real
    /// arguments and whose remaining ones stand for extracted constants.
    fn lower(&self, skeleton: &Lambda, original_arity: usize) -> Result<Artifact, CompileError>;
}

/// The default backend: compiles to closure trees via [`mold_eval::lower`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ClosureBackend;

impl Backend for ClosureBackend {
    fn lower(&self, skeleton: &Lambda, original_arity: usize) -> Result<Artifact, CompileError> {
        mold_eval::lower(skeleton, original_arity)
    }
}

//! Callable handle returned by `compile`.

use std::fmt;
use std::sync::Arc;

use mold_eval::Artifact;
use mold_ir::{Type, Value};

use crate::error::Error;
use crate::invoke::invoke;

/// A compiled expression: a shared artifact plus this expression's own
/// constants.
///
/// Cheap to clone, `Send + Sync`. Two handles compiled from expressions of
/// the same shape share one artifact but keep separate constants.
#[derive(Clone)]
pub struct CompiledFn {
    artifact: Arc<Artifact>,
    values: Arc<[Value]>,
}

impl CompiledFn {
    pub(crate) fn new(artifact: Arc<Artifact>, values: Arc<[Value]>) -> Self {
        debug_assert_eq!(artifact.value_count(), values.len());
        CompiledFn { artifact, values }
    }

    /// Call with the expression's declared parameters.
    pub fn call(&self, args: &[Value]) -> Result<Value, Error> {
        invoke(&self.artifact, &self.values, args, self.arity())
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.artifact.arity() - self.artifact.value_count()
    }

    /// Types of the declared parameters.
    pub fn param_types(&self) -> &[Type] {
        &self.artifact.param_types()[self.artifact.value_count()..]
    }

    pub fn return_type(&self) -> &Type {
        self.artifact.return_type()
    }

    /// The constants extracted from the compiled expression, in the order
    /// they are passed to the artifact.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Whether both handles run the same compiled artifact.
    pub fn shares_artifact_with(&self, other: &CompiledFn) -> bool {
        Arc::ptr_eq(&self.artifact, &other.artifact)
    }
}

impl fmt::Debug for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFn")
            .field("param_types", &self.param_types())
            .field("return_type", self.return_type())
            .field("values", &self.values)
            .finish()
    }
}

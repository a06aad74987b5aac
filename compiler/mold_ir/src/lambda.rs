//! Parameterized expressions.

use crate::arena::ExprArena;
use crate::ids::ExprId;
use crate::name::Name;
use crate::types::Type;

/// A formal parameter: display name plus static type.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A parameterized expression: ordered formal parameters and a body tree.
///
/// Immutable once built. Callers typically build a fresh `Lambda` for every
/// logical call; the compiler caches per shape, not per instance.
#[derive(Clone, Debug)]
pub struct Lambda {
    params: Vec<Param>,
    arena: ExprArena,
    root: ExprId,
}

impl Lambda {
    /// Assemble a lambda from its parts.
    ///
    /// No validation happens here; `mold_shape::extract` rejects malformed
    /// trees before anything is compiled.
    pub fn new(params: Vec<Param>, arena: ExprArena, root: ExprId) -> Self {
        Self {
            params,
            arena,
            root,
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of formal parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn root(&self) -> ExprId {
        self.root
    }

    /// Static type of the body.
    ///
    /// # Panics
    ///
    /// Panics if the root id is not in the arena.
    pub fn return_type(&self) -> &Type {
        self.arena.ty(self.root)
    }

    pub fn into_parts(self) -> (Vec<Param>, ExprArena, ExprId) {
        (self.params, self.arena, self.root)
    }
}

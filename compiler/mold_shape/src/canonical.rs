//! Canonical cache keys.
//!
//! A [`CanonicalKey`] is a lambda whose constants all hold their type's
//! default value. Keys built from expressions that differ only in constant
//! values are equal, and the hash is computed once at construction.

use std::hash::{Hash, Hasher};

use mold_ir::{ExprKind, Lambda, Param, Value};

use crate::compare::{shape_hash, shapes_equal};
use crate::error::ExtractError;
use crate::extract::extract_values;
use crate::substitute::substitute_params;

/// Shape-only identity of an expression.
///
/// `Eq` and `Hash` follow [`shapes_equal`] and [`shape_hash`].
#[derive(Clone)]
pub struct CanonicalKey {
    lambda: Lambda,
    hash: u64,
}

impl CanonicalKey {
    fn from_lambda(lambda: Lambda) -> Self {
        let hash = shape_hash(&lambda);
        CanonicalKey { lambda, hash }
    }

    /// Key for `expr` without going through a skeleton.
    ///
    /// Every constant value is erased to its type's default. `expr` must have
    /// passed [`extract`](crate::extract) or [`extract_values`]; the result
    /// is equal to `canonicalize(extract(expr)?.skeleton, expr.params())`.
    pub fn probe(expr: &Lambda) -> Self {
        let arena = expr.arena().map_kinds(|_, kind, ty| match kind {
            ExprKind::Const(_) => ExprKind::Const(ty.default_value()),
            _ => kind.clone(),
        });
        Self::from_lambda(Lambda::new(expr.params().to_vec(), arena, expr.root()))
    }

    /// The canonical lambda.
    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    pub fn shape_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for CanonicalKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && shapes_equal(&self.lambda, &other.lambda)
    }
}

impl Eq for CanonicalKey {}

impl Hash for CanonicalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl std::fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CanonicalKey({:#018x}, {})", self.hash, self.lambda)
    }
}

/// Build the cache key of a skeleton.
///
/// `original_params` are the parameters of the expression the skeleton was
/// extracted from. Every later parameter is a placeholder and is replaced by
/// a constant holding its type's default value.
pub fn canonicalize(skeleton: &Lambda, original_params: &[Param]) -> CanonicalKey {
    let n = original_params.len();
    debug_assert!(
        skeleton.params().len() >= n
            && skeleton
                .params()
                .iter()
                .zip(original_params)
                .all(|(s, o)| s.ty == o.ty),
        "skeleton parameters do not start with the original parameters"
    );
    let lambda = substitute_params(skeleton, original_params.to_vec(), |index, ty| {
        (index as usize >= n).then(|| ty.default_value())
    });
    CanonicalKey::from_lambda(lambda)
}

/// Validate `expr` and return its key together with its constants.
///
/// The combination the cache-hit path needs: no skeleton is built.
pub fn key_and_values(expr: &Lambda) -> Result<(CanonicalKey, Vec<Value>), ExtractError> {
    let values = extract_values(expr)?;
    Ok((CanonicalKey::probe(expr), values))
}

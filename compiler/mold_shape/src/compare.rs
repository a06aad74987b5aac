//! Structural equality and hashing that ignore constant values.
//!
//! Two lambdas have the same shape when they agree on parameter types and,
//! position by position, on node kind, operator, builtin, let slot,
//! parameter index, static type and child count. What a `Const` leaf holds
//! and what a parameter is called do not matter.
//!
//! # Strategy
//!
//! Recursive depth-first traversal, children in canonical order. For each
//! node:
//! 1. Hash `discriminant(kind)`
//! 2. Hash the resolved type
//! 3. Hash non-child data (operator, slot, index, builtin, list length)
//! 4. Recurse into children
//!
//! `ExprId` values are never hashed. A child that does not precede its
//! parent hashes as a sentinel instead of being followed, so both functions
//! terminate on malformed trees.

use std::hash::{Hash, Hasher};
use std::mem;

use mold_ir::stack::ensure_sufficient_stack;
use mold_ir::visitor::try_children;
use mold_ir::{ExprArena, ExprId, ExprKind, Lambda};
use rustc_hash::FxHasher;

/// Fingerprint of the shape of `expr`.
///
/// Consistent with [`shapes_equal`]: equal shapes hash equally.
pub fn shape_hash(expr: &Lambda) -> u64 {
    let mut hasher = FxHasher::default();
    expr.arity().hash(&mut hasher);
    for param in expr.params() {
        param.ty.hash(&mut hasher);
    }
    hash_node(expr.arena(), expr.root(), None, &mut hasher);
    hasher.finish()
}

fn hash_node(arena: &ExprArena, id: ExprId, parent: Option<ExprId>, state: &mut FxHasher) {
    let (Some(kind), Some(ty)) = (arena.get_kind(id), arena.get_ty(id)) else {
        u32::MAX.hash(state);
        return;
    };
    if parent.is_some_and(|parent| id >= parent) {
        u32::MAX.hash(state);
        return;
    }

    mem::discriminant(kind).hash(state);
    ty.hash(state);

    match kind {
        // Value deliberately left out.
        ExprKind::Const(_) => {}
        ExprKind::Param(index) => index.hash(state),
        ExprKind::Local(slot) | ExprKind::Let { slot, .. } => slot.hash(state),
        ExprKind::Unary { op, .. } => op.hash(state),
        ExprKind::Binary { op, .. } => op.hash(state),
        ExprKind::Call { func, .. } => func.hash(state),
        ExprKind::If { .. } | ExprKind::List(_) | ExprKind::Index { .. } => {}
    }

    let Some(children) = try_children(arena, kind) else {
        u32::MAX.hash(state);
        return;
    };
    children.len().hash(state);
    ensure_sufficient_stack(|| {
        for child in children {
            hash_node(arena, child, Some(id), state);
        }
    });
}

/// Whether `a` and `b` have the same shape.
///
/// This is the equality the compilation cache keys on: a `true` result means
/// the two expressions may share one compiled artifact.
pub fn shapes_equal(a: &Lambda, b: &Lambda) -> bool {
    a.arity() == b.arity()
        && a.params()
            .iter()
            .zip(b.params())
            .all(|(pa, pb)| pa.ty == pb.ty)
        && Pair {
            a: a.arena(),
            b: b.arena(),
        }
        .node(a.root(), b.root(), None)
}

struct Pair<'a> {
    a: &'a ExprArena,
    b: &'a ExprArena,
}

impl Pair<'_> {
    /// `parents` holds the parent ids in `a` and `b`, if any.
    fn node(&self, ia: ExprId, ib: ExprId, parents: Option<(ExprId, ExprId)>) -> bool {
        let (Some(ka), Some(ta)) = (self.a.get_kind(ia), self.a.get_ty(ia)) else {
            return false;
        };
        let (Some(kb), Some(tb)) = (self.b.get_kind(ib), self.b.get_ty(ib)) else {
            return false;
        };
        if parents.is_some_and(|(pa, pb)| ia >= pa || ib >= pb) {
            return false;
        }
        if ta != tb || mem::discriminant(ka) != mem::discriminant(kb) {
            return false;
        }

        let same_data = match (ka, kb) {
            (ExprKind::Const(_), ExprKind::Const(_))
            | (ExprKind::If { .. }, ExprKind::If { .. })
            | (ExprKind::List(_), ExprKind::List(_))
            | (ExprKind::Index { .. }, ExprKind::Index { .. }) => true,
            (ExprKind::Param(x), ExprKind::Param(y))
            | (ExprKind::Local(x), ExprKind::Local(y))
            | (ExprKind::Let { slot: x, .. }, ExprKind::Let { slot: y, .. }) => x == y,
            (ExprKind::Unary { op: x, .. }, ExprKind::Unary { op: y, .. }) => x == y,
            (ExprKind::Binary { op: x, .. }, ExprKind::Binary { op: y, .. }) => x == y,
            (ExprKind::Call { func: x, .. }, ExprKind::Call { func: y, .. }) => x == y,
            _ => false,
        };
        if !same_data {
            return false;
        }

        let (Some(ca), Some(cb)) = (try_children(self.a, ka), try_children(self.b, kb)) else {
            return false;
        };
        ca.len() == cb.len()
            && ensure_sufficient_stack(|| {
                ca.iter()
                    .zip(&cb)
                    .all(|(&ca, &cb)| self.node(ca, cb, Some((ia, ib))))
            })
    }
}

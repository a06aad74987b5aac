//! Child enumeration in canonical order.
//!
//! Every traversal in the workspace visits children in the order
//! [`children`] returns them. Extraction relies on this: the position of a
//! constant in the extracted value sequence is its pre-order rank under this
//! ordering, so hashing, comparison and extraction must never disagree.

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::ExprKind;
use crate::ids::ExprId;

/// Inline capacity covers every fixed-arity variant.
pub type Children = SmallVec<[ExprId; 3]>;

/// Children of a node, in canonical order.
///
/// | Variant  | Order                              |
/// |----------|------------------------------------|
/// | `Unary`  | operand                            |
/// | `Binary` | left, right                        |
/// | `If`     | cond, then, else                   |
/// | `Let`    | init, body                         |
/// | `List`   | elements                           |
/// | `Index`  | receiver, index                    |
/// | `Call`   | arguments                          |
///
/// # Panics
///
/// Panics if a child list range runs past the arena's list table. Callers
/// that handle unvalidated trees use [`try_children`].
pub fn children(arena: &ExprArena, kind: &ExprKind) -> Children {
    match kind {
        ExprKind::Const(_) | ExprKind::Param(_) | ExprKind::Local(_) => Children::new(),
        ExprKind::Unary { operand, .. } => smallvec::smallvec![*operand],
        ExprKind::Binary { left, right, .. } => smallvec::smallvec![*left, *right],
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => smallvec::smallvec![*cond, *then_branch, *else_branch],
        ExprKind::Let { init, body, .. } => smallvec::smallvec![*init, *body],
        ExprKind::List(items) => arena.list(*items).iter().copied().collect(),
        ExprKind::Index { receiver, index } => smallvec::smallvec![*receiver, *index],
        ExprKind::Call { args, .. } => arena.list(*args).iter().copied().collect(),
    }
}

/// Like [`children`], but returns `None` when a child list range is out of
/// bounds instead of panicking.
pub fn try_children(arena: &ExprArena, kind: &ExprKind) -> Option<Children> {
    match kind {
        ExprKind::List(range) | ExprKind::Call { args: range, .. } => {
            arena.get_list(*range).map(|ids| ids.iter().copied().collect())
        }
        _ => Some(children(arena, kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExprBuilder, Type};

    #[test]
    fn if_children_in_order() {
        let mut b = ExprBuilder::new();
        let c = b.bool(true);
        let t = b.int(1);
        let e = b.int(2);
        let root = b.if_else(c, t, e);
        let lambda = b.finish(root);

        let kids = children(lambda.arena(), lambda.arena().kind(root));
        assert_eq!(kids.as_slice(), &[c, t, e]);
    }

    #[test]
    fn out_of_range_list_is_reported() {
        let mut arena = ExprArena::new();
        let bogus = crate::ExprRange::new(4, 2);
        let root = arena.push(ExprKind::List(bogus), Type::list(Type::Int));
        assert!(try_children(&arena, arena.kind(root)).is_none());
    }
}

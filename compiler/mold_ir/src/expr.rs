//! Expression node kinds.

use crate::ids::{ExprId, ExprRange};
use crate::ops::{BinaryOp, Builtin, UnaryOp};
use crate::value::Value;

/// The kind of an expression node. The node's static type lives alongside it
/// in the arena.
///
/// Child order is fixed per variant and is the order every traversal uses:
/// extraction, hashing, comparison, lowering and printing all agree on it.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// An embedded value: either an inline literal or a captured context value.
    Const(Value),
    /// Reference to the lambda's formal parameter at this position.
    Param(u32),
    /// Reference to a `Let`-bound slot.
    Local(u32),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    /// `let slot = init in body`. `slot` is visible in `body` only.
    Let {
        slot: u32,
        init: ExprId,
        body: ExprId,
    },
    /// List construction; the element type is the node's list element type.
    List(ExprRange),
    Index {
        receiver: ExprId,
        index: ExprId,
    },
    Call {
        func: Builtin,
        args: ExprRange,
    },
}

impl ExprKind {
    /// Returns `true` for nodes without children.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ExprKind::Const(_) | ExprKind::Param(_) | ExprKind::Local(_)
        )
    }

    /// Short variant name for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ExprKind::Const(_) => "const",
            ExprKind::Param(_) => "param",
            ExprKind::Local(_) => "local",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Binary { .. } => "binary",
            ExprKind::If { .. } => "if",
            ExprKind::Let { .. } => "let",
            ExprKind::List(_) => "list",
            ExprKind::Index { .. } => "index",
            ExprKind::Call { .. } => "call",
        }
    }
}

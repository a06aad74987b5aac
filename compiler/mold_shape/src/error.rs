//! Structural extraction errors.

use mold_ir::{ExprId, Type};

/// The tree cannot be split into skeleton and values.
///
/// Raised before any cache interaction, so a malformed expression never
/// leaves a trace in the cache. Not retriable: the same tree fails the same
/// way every time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("root {root:?} is not in the arena ({len} nodes)")]
    DanglingRoot { root: ExprId, len: usize },

    #[error("node {parent:?} refers to child {child:?}, which does not precede it")]
    ForwardReference { parent: ExprId, child: ExprId },

    #[error("child list of node {node:?} runs past the arena's list table")]
    DanglingList { node: ExprId },

    #[error("node {node:?} references parameter #{index}, but only {arity} are declared")]
    UnboundParam {
        node: ExprId,
        index: u32,
        arity: usize,
    },

    #[error("node {node:?} references let slot l{slot} outside of its binding")]
    UnboundLocal { node: ExprId, slot: u32 },

    #[error("constant at {node:?} holds a {found} value but the node is typed {expected}")]
    ConstTypeMismatch {
        node: ExprId,
        expected: Type,
        found: Type,
    },
}

use mold_ir::{BinaryOp, Builtin, ExprId, Type, UnaryOp};

/// Lowering rejected a skeleton.
///
/// Nothing is cached when lowering fails, so a later request for the same
/// shape lowers again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (at {node:?})")]
pub struct CompileError {
    /// The offending node.
    pub node: ExprId,
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub(crate) fn new(node: ExprId, kind: CompileErrorKind) -> Self {
        CompileError { node, kind }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    // Structure
    #[error("{original} original parameters declared, but the skeleton only has {arity}")]
    OriginalArity { original: usize, arity: usize },
    #[error("child {child:?} is missing or does not precede its parent")]
    DanglingNode { child: ExprId },
    #[error("child list runs past the arena's list table")]
    DanglingList,
    #[error("parameter #{index} is not declared ({arity} parameters)")]
    UnboundParam { index: u32, arity: usize },
    #[error("let slot l{slot} is not bound here")]
    UnboundLocal { slot: u32 },

    // Types
    #[error("parameter #{index} is declared {declared} but referenced as {found}")]
    ParamTypeMismatch {
        index: u32,
        declared: Type,
        found: Type,
    },
    #[error("constant of type {found} in a node typed {expected}")]
    ConstTypeMismatch { expected: Type, found: Type },
    #[error("node is typed {recorded} but produces {computed}")]
    TypeMismatch { recorded: Type, computed: Type },
    #[error("unary `{}` cannot be applied to {operand}", .op.as_symbol())]
    InvalidUnaryOperand { op: UnaryOp, operand: Type },
    #[error("operator `{}` cannot be applied to {left} and {right}", .op.as_symbol())]
    InvalidOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("condition must be bool, found {found}")]
    NonBoolCondition { found: Type },
    #[error("branches disagree: {then_ty} vs {else_ty}")]
    BranchMismatch { then_ty: Type, else_ty: Type },
    #[error("list literal of {expected} contains {found}")]
    ListElement { expected: Type, found: Type },
    #[error("cannot index into {found}")]
    NotAList { found: Type },
    #[error("list index must be int, found {found}")]
    NonIntIndex { found: Type },
    #[error("{} takes {expected} arguments, got {got}", .func.name())]
    BuiltinArity {
        func: Builtin,
        expected: usize,
        got: usize,
    },
    #[error("{} does not accept {found}", .func.name())]
    BuiltinArgument { func: Builtin, found: Type },
}

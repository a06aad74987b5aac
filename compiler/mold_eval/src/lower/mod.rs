//! Lowering skeletons into closure trees.
//!
//! Each node becomes a boxed closure over its children's closures, in the
//! style of a closure-compiling evaluator: the tree is walked once at
//! compile time and never again at call time.
//!
//! # Checks
//!
//! Every node is type-checked before its closure is built, so a
//! [`CompileError`] means no artifact exists. Structural problems a
//! validated skeleton cannot have (dangling ids, unbound slots) are
//! reported the same way instead of panicking.
//!
//! # Slots
//!
//! Parameter references are resolved to flat-vector positions here (see
//! [`Artifact`]). Let slots are resolved lexically: every `Let` node owns
//! one frame cell and a `Local` reads the cell of the innermost enclosing
//! `Let` with the same slot number.

mod artifact;
mod error;

use mold_ir::stack::ensure_sufficient_stack;
use mold_ir::{BinaryOp, Builtin, ExprArena, ExprId, ExprKind, Lambda, Type, UnaryOp, Value};
use smallvec::SmallVec;
use tracing::debug;

pub use artifact::Artifact;
pub use error::{CompileError, CompileErrorKind};

use crate::builtins::{call_builtin, index_value};
use crate::errors::{type_mismatch, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary};
use artifact::{Code, Frame, StackGuarded};

/// Depth interval at which compiled closures re-check the native stack,
/// both when called and when dropped.
const STACK_CHECK_INTERVAL: usize = 32;

/// Lower `skeleton` into an [`Artifact`].
///
/// `original_arity` is how many of the skeleton's parameters are real
/// arguments; the rest are placeholders for extracted constants and move to
/// the front of the artifact's argument vector.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        nodes = skeleton.arena().len(),
        arity = skeleton.arity(),
        original_arity = original_arity,
    )
)]
pub fn lower(skeleton: &Lambda, original_arity: usize) -> Result<Artifact, CompileError> {
    let arity = skeleton.arity();
    let root = skeleton.root();
    let Some(value_count) = arity.checked_sub(original_arity) else {
        return Err(CompileError::new(
            root,
            CompileErrorKind::OriginalArity {
                original: original_arity,
                arity,
            },
        ));
    };

    let mut lowerer = Lowerer {
        arena: skeleton.arena(),
        params: skeleton.params().iter().map(|p| p.ty.clone()).collect(),
        original_arity,
        value_count,
        scope: Vec::new(),
        cells: 0,
        depth: 0,
    };
    let (code, return_type) = lowerer.node(root, None)?;

    // Flat order: placeholders first, then the original parameters.
    let mut param_types = Vec::with_capacity(arity);
    param_types.extend_from_slice(&lowerer.params[original_arity..]);
    param_types.extend_from_slice(&lowerer.params[..original_arity]);

    debug!(cells = lowerer.cells, %return_type, "lowered");
    Ok(Artifact::new(
        param_types,
        value_count,
        return_type,
        lowerer.cells,
        code,
    ))
}

struct Lowerer<'a> {
    arena: &'a ExprArena,
    /// Skeleton parameter types, in skeleton order.
    params: Vec<Type>,
    original_arity: usize,
    value_count: usize,
    /// Enclosing lets, innermost last: (slot, cell, type).
    scope: Vec<(u32, usize, Type)>,
    cells: usize,
    depth: usize,
}

type Lowered = Result<(Code, Type), CompileError>;

/// Box a closure as [`Code`], fixing its signature.
fn code_of(f: impl Fn(&mut Frame<'_>) -> EvalResult + Send + Sync + 'static) -> Code {
    Box::new(f)
}

impl Lowerer<'_> {
    fn node(&mut self, id: ExprId, parent: Option<ExprId>) -> Lowered {
        let dangling = |child| {
            CompileError::new(
                parent.unwrap_or(child),
                CompileErrorKind::DanglingNode { child },
            )
        };
        if parent.is_some_and(|parent| id >= parent) {
            return Err(dangling(id));
        }
        let (Some(kind), Some(ty)) = (self.arena.get_kind(id), self.arena.get_ty(id)) else {
            return Err(dangling(id));
        };

        self.depth += 1;
        let lowered = ensure_sufficient_stack(|| self.kind(id, kind, ty));
        self.depth -= 1;
        let (code, computed) = lowered?;

        if computed != *ty {
            return Err(CompileError::new(
                id,
                CompileErrorKind::TypeMismatch {
                    recorded: ty.clone(),
                    computed,
                },
            ));
        }

        let code = if self.depth % STACK_CHECK_INTERVAL == 0 && !kind.is_leaf() {
            let guarded = StackGuarded::new(code);
            code_of(move |frame| guarded.run(frame))
        } else {
            code
        };
        Ok((code, computed))
    }

    fn kind(&mut self, id: ExprId, kind: &ExprKind, ty: &Type) -> Lowered {
        let err = |kind| Err(CompileError::new(id, kind));
        match kind {
            ExprKind::Const(value) => {
                if !value.has_type(ty) {
                    return err(CompileErrorKind::ConstTypeMismatch {
                        expected: ty.clone(),
                        found: value.ty(),
                    });
                }
                let value = value.clone();
                Ok((code_of(move |_| Ok(value.clone())), ty.clone()))
            }
            ExprKind::Param(index) => self.param(id, *index, ty),
            ExprKind::Local(slot) => {
                let Some((_, cell, bound)) = self.scope.iter().rev().find(|(s, ..)| s == slot)
                else {
                    return err(CompileErrorKind::UnboundLocal { slot: *slot });
                };
                let cell = *cell;
                let bound = bound.clone();
                Ok((code_of(move |frame| Ok(frame.cells[cell].clone())), bound))
            }
            ExprKind::Unary { op, operand } => self.unary(id, *op, *operand),
            ExprKind::Binary { op, left, right } => self.binary(id, *op, *left, *right),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.if_else(id, *cond, *then_branch, *else_branch),
            ExprKind::Let { slot, init, body } => {
                let (init, init_ty) = self.node(*init, Some(id))?;
                let cell = self.cells;
                self.cells += 1;
                self.scope.push((*slot, cell, init_ty));
                let body = self.node(*body, Some(id));
                self.scope.pop();
                let (body, body_ty) = body?;
                let code = code_of(move |frame| {
                    let value = init(frame)?;
                    frame.cells[cell] = value;
                    body(frame)
                });
                Ok((code, body_ty))
            }
            ExprKind::List(range) => {
                let Some(ids) = self.arena.get_list(*range) else {
                    return err(CompileErrorKind::DanglingList);
                };
                let Some(elem) = ty.elem().cloned() else {
                    return err(CompileErrorKind::NotAList { found: ty.clone() });
                };
                let mut items = Vec::with_capacity(ids.len());
                for &item in ids {
                    let (code, item_ty) = self.node(item, Some(id))?;
                    if item_ty != elem {
                        return err(CompileErrorKind::ListElement {
                            expected: elem,
                            found: item_ty,
                        });
                    }
                    items.push(code);
                }
                let list_ty = Type::list(elem.clone());
                let code = code_of(move |frame| {
                    let values = items
                        .iter()
                        .map(|item| item(frame))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::list(elem.clone(), values))
                });
                Ok((code, list_ty))
            }
            ExprKind::Index { receiver, index } => {
                let (receiver, receiver_ty) = self.node(*receiver, Some(id))?;
                let (index, index_ty) = self.node(*index, Some(id))?;
                let Some(elem) = receiver_ty.elem().cloned() else {
                    return err(CompileErrorKind::NotAList { found: receiver_ty });
                };
                if index_ty != Type::Int {
                    return err(CompileErrorKind::NonIntIndex { found: index_ty });
                }
                let code = code_of(move |frame| {
                    let receiver = receiver(frame)?;
                    let index = index(frame)?;
                    index_value(&receiver, &index)
                });
                Ok((code, elem))
            }
            ExprKind::Call { func, args } => self.call(id, *func, *args),
        }
    }

    fn param(&mut self, id: ExprId, index: u32, ty: &Type) -> Lowered {
        let slot = index as usize;
        let Some(declared) = self.params.get(slot) else {
            return Err(CompileError::new(
                id,
                CompileErrorKind::UnboundParam {
                    index,
                    arity: self.params.len(),
                },
            ));
        };
        if declared != ty {
            return Err(CompileError::new(
                id,
                CompileErrorKind::ParamTypeMismatch {
                    index,
                    declared: declared.clone(),
                    found: ty.clone(),
                },
            ));
        }
        let position = if slot < self.original_arity {
            self.value_count + slot
        } else {
            slot - self.original_arity
        };
        Ok((
            code_of(move |frame| Ok(frame.args[position].clone())),
            declared.clone(),
        ))
    }

    fn unary(&mut self, id: ExprId, op: UnaryOp, operand: ExprId) -> Lowered {
        let (operand, operand_ty) = self.node(operand, Some(id))?;
        let accepted = match op {
            UnaryOp::Neg => operand_ty.is_numeric(),
            UnaryOp::Not => operand_ty == Type::Bool,
        };
        if !accepted {
            return Err(CompileError::new(
                id,
                CompileErrorKind::InvalidUnaryOperand {
                    op,
                    operand: operand_ty,
                },
            ));
        }
        let result = op.result_type(&operand_ty);
        let code = code_of(move |frame| evaluate_unary(op, &operand(frame)?));
        Ok((code, result))
    }

    fn binary(&mut self, id: ExprId, op: BinaryOp, left: ExprId, right: ExprId) -> Lowered {
        let (left, left_ty) = self.node(left, Some(id))?;
        let (right, right_ty) = self.node(right, Some(id))?;
        if !binary_accepts(op, &left_ty, &right_ty) {
            return Err(CompileError::new(
                id,
                CompileErrorKind::InvalidOperands {
                    op,
                    left: left_ty,
                    right: right_ty,
                },
            ));
        }
        let result = op.result_type(&left_ty);
        let code = match op {
            BinaryOp::And => code_of(move |frame| match left(frame)? {
                Value::Bool(true) => right(frame),
                decided => Ok(decided),
            }),
            BinaryOp::Or => code_of(move |frame| match left(frame)? {
                Value::Bool(false) => right(frame),
                decided => Ok(decided),
            }),
            _ => code_of(move |frame| {
                let left = left(frame)?;
                let right = right(frame)?;
                evaluate_binary(&left, &right, op)
            }),
        };
        Ok((code, result))
    }

    fn if_else(&mut self, id: ExprId, cond: ExprId, then_id: ExprId, else_id: ExprId) -> Lowered {
        let (cond, cond_ty) = self.node(cond, Some(id))?;
        let (then_branch, then_ty) = self.node(then_id, Some(id))?;
        let (else_branch, else_ty) = self.node(else_id, Some(id))?;
        if cond_ty != Type::Bool {
            return Err(CompileError::new(
                id,
                CompileErrorKind::NonBoolCondition { found: cond_ty },
            ));
        }
        if then_ty != else_ty {
            return Err(CompileError::new(
                id,
                CompileErrorKind::BranchMismatch { then_ty, else_ty },
            ));
        }
        let code = code_of(move |frame| match cond(frame)? {
            Value::Bool(true) => then_branch(frame),
            Value::Bool(false) => else_branch(frame),
            other => Err(type_mismatch(&Type::Bool, &other.ty())),
        });
        Ok((code, then_ty))
    }

    fn call(&mut self, id: ExprId, func: Builtin, args: mold_ir::ExprRange) -> Lowered {
        let Some(ids) = self.arena.get_list(args) else {
            return Err(CompileError::new(id, CompileErrorKind::DanglingList));
        };
        if ids.len() != func.arity() {
            return Err(CompileError::new(
                id,
                CompileErrorKind::BuiltinArity {
                    func,
                    expected: func.arity(),
                    got: ids.len(),
                },
            ));
        }

        let mut codes: SmallVec<[Code; 2]> = SmallVec::new();
        let mut types: SmallVec<[Type; 2]> = SmallVec::new();
        for &arg in ids {
            let (code, ty) = self.node(arg, Some(id))?;
            codes.push(code);
            types.push(ty);
        }
        if let Some(found) = builtin_rejects(func, &types) {
            return Err(CompileError::new(
                id,
                CompileErrorKind::BuiltinArgument { func, found },
            ));
        }

        let result = func.result_type(types.first());
        let code = code_of(move |frame| {
            let values = codes
                .iter()
                .map(|code| code(frame))
                .collect::<Result<SmallVec<[Value; 2]>, _>>()?;
            call_builtin(func, &values)
        });
        Ok((code, result))
    }
}

/// Operand types accepted by `op`.
fn binary_accepts(op: BinaryOp, left: &Type, right: &Type) -> bool {
    if left != right {
        return false;
    }
    match op {
        BinaryOp::Add => left.is_numeric() || matches!(left, Type::Str | Type::List(_)),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => left.is_numeric(),
        BinaryOp::Eq | BinaryOp::NotEq => true,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => left.is_ordered(),
        BinaryOp::And | BinaryOp::Or => *left == Type::Bool,
    }
}

/// The first argument type `func` does not accept, if any.
fn builtin_rejects(func: Builtin, args: &[Type]) -> Option<Type> {
    let accepts = |ty: &Type| match func {
        Builtin::Abs => ty.is_numeric(),
        Builtin::Min | Builtin::Max => ty.is_ordered(),
        Builtin::Len => matches!(ty, Type::Str | Type::List(_)),
        Builtin::ToFloat => *ty == Type::Int,
        Builtin::ToInt => *ty == Type::Float,
    };
    if let Some(bad) = args.iter().find(|ty| !accepts(ty)) {
        return Some(bad.clone());
    }
    // min/max need both sides of the same type.
    match args {
        [first, second] if first != second => Some(second.clone()),
        _ => None,
    }
}

//! Builder for [`Lambda`] expressions.
//!
//! The builder infers each node's static type from its operands using the
//! same rules the lowering type checker enforces, so well-typed input yields
//! a tree that lowers without error. Ill-typed combinations are still
//! recorded (with a best-effort type) and rejected later by lowering.

use crate::arena::{to_u32, ExprArena};
use crate::expr::ExprKind;
use crate::ids::ExprId;
use crate::lambda::{Lambda, Param};
use crate::ops::{BinaryOp, Builtin, UnaryOp};
use crate::types::Type;
use crate::value::Value;

/// Incrementally constructs a [`Lambda`].
///
/// # Example
///
/// ```
/// use mold_ir::{ExprBuilder, Type};
///
/// // |x: int| x * 2 + 10
/// let mut b = ExprBuilder::new();
/// let x = b.param("x", Type::Int);
/// let two = b.int(2);
/// let doubled = b.mul(x, two);
/// let ten = b.int(10);
/// let body = b.add(doubled, ten);
/// let lambda = b.finish(body);
/// assert_eq!(lambda.to_string(), "|x: int| ((x * 2) + 10)");
/// ```
#[derive(Default)]
pub struct ExprBuilder {
    params: Vec<Param>,
    arena: ExprArena,
    /// Types of let slots, indexed by slot number.
    local_types: Vec<Type>,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new formal parameter and return a reference to it.
    pub fn param(&mut self, name: &str, ty: Type) -> ExprId {
        let index = to_u32(self.params.len(), "parameters");
        self.params.push(Param::new(name, ty.clone()));
        self.arena.push(ExprKind::Param(index), ty)
    }

    /// Another reference to an already declared parameter.
    ///
    /// # Panics
    ///
    /// Panics if no parameter with this index was declared.
    pub fn param_ref(&mut self, index: u32) -> ExprId {
        let ty = self.params[index as usize].ty.clone();
        self.arena.push(ExprKind::Param(index), ty)
    }

    /// Embed a captured context value.
    pub fn constant(&mut self, value: Value) -> ExprId {
        let ty = value.ty();
        self.arena.push(ExprKind::Const(value), ty)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.constant(Value::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.constant(Value::Float(value))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.constant(Value::Bool(value))
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        self.constant(Value::str(value))
    }

    pub fn unit(&mut self) -> ExprId {
        self.constant(Value::Unit)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        let ty = op.result_type(self.arena.ty(operand));
        self.arena.push(ExprKind::Unary { op, operand }, ty)
    }

    pub fn neg(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Neg, operand)
    }

    pub fn not(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Not, operand)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let ty = op.result_type(self.arena.ty(left));
        self.arena.push(ExprKind::Binary { op, left, right }, ty)
    }

    pub fn add(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::Add, left, right)
    }

    pub fn sub(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::Mul, left, right)
    }

    pub fn lt(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::Lt, left, right)
    }

    pub fn eq(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary(BinaryOp::Eq, left, right)
    }

    pub fn if_else(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        let ty = self.arena.ty(then_branch).clone();
        self.arena.push(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            ty,
        )
    }

    /// `let slot = init in body(slot)`.
    ///
    /// `body` receives a reference to the new slot. Slots are numbered in
    /// construction order, so building the same tree twice numbers them the
    /// same way.
    pub fn let_in(
        &mut self,
        init: ExprId,
        body: impl FnOnce(&mut Self, ExprId) -> ExprId,
    ) -> ExprId {
        let slot = to_u32(self.local_types.len(), "let slots");
        let init_ty = self.arena.ty(init).clone();
        self.local_types.push(init_ty.clone());
        let local = self.arena.push(ExprKind::Local(slot), init_ty);
        let body = body(self, local);
        let ty = self.arena.ty(body).clone();
        self.arena.push(ExprKind::Let { slot, init, body }, ty)
    }

    /// List literal with an explicit element type.
    pub fn list(&mut self, elem: Type, items: &[ExprId]) -> ExprId {
        let range = self.arena.push_list(items);
        self.arena.push(ExprKind::List(range), Type::list(elem))
    }

    pub fn index(&mut self, receiver: ExprId, index: ExprId) -> ExprId {
        let receiver_ty = self.arena.ty(receiver);
        let ty = receiver_ty
            .elem()
            .cloned()
            .unwrap_or_else(|| receiver_ty.clone());
        self.arena.push(ExprKind::Index { receiver, index }, ty)
    }

    pub fn call(&mut self, func: Builtin, args: &[ExprId]) -> ExprId {
        let ty = func.result_type(args.first().map(|&arg| self.arena.ty(arg)));
        let range = self.arena.push_list(args);
        self.arena.push(ExprKind::Call { func, args: range }, ty)
    }

    /// Finish building with `root` as the body.
    pub fn finish(self, root: ExprId) -> Lambda {
        Lambda::new(self.params, self.arena, root)
    }
}

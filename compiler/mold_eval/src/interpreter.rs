//! Reference tree-walking interpreter.
//!
//! Evaluates a [`Lambda`] directly, with no lowering and no caching. This is
//! the oracle compiled artifacts are checked against: for every expression
//! and argument list, calling the cached artifact must produce what
//! [`interpret`] produces.

use mold_ir::stack::ensure_sufficient_stack;
use mold_ir::{BinaryOp, ExprArena, ExprId, ExprKind, Lambda, Value};
use smallvec::SmallVec;

use crate::builtins::{call_builtin, index_value};
use crate::errors::{type_mismatch, undefined_variable, wrong_arg_count, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary};

/// Evaluate `expr` with `args` bound to its parameters.
///
/// Arguments are checked against the declared parameter count and types
/// before evaluation starts.
///
/// # Panics
///
/// Panics if the tree references a node or child list outside its arena.
/// Trees accepted by `mold_shape::extract` never do.
pub fn interpret(expr: &Lambda, args: &[Value]) -> EvalResult {
    if args.len() != expr.arity() {
        return Err(wrong_arg_count("", expr.arity(), args.len()));
    }
    for (param, arg) in expr.params().iter().zip(args) {
        let ty = arg.ty();
        if ty != param.ty {
            return Err(type_mismatch(&param.ty, &ty));
        }
    }

    Interpreter {
        arena: expr.arena(),
        args,
        scope: Vec::new(),
    }
    .eval(expr.root())
}

struct Interpreter<'a> {
    arena: &'a ExprArena,
    args: &'a [Value],
    /// Let bindings in scope, innermost last.
    scope: Vec<(u32, Value)>,
}

impl Interpreter<'_> {
    fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Const(value) => Ok(value.clone()),
            ExprKind::Param(index) => self
                .args
                .get(*index as usize)
                .cloned()
                .ok_or_else(|| undefined_variable(&format!("#{index}"))),
            ExprKind::Local(slot) => self
                .scope
                .iter()
                .rev()
                .find(|(bound, _)| bound == slot)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| undefined_variable(&format!("l{slot}"))),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(*operand)?;
                evaluate_unary(*op, &operand)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(*left)?;
                match (op, &left) {
                    (BinaryOp::And, Value::Bool(false)) | (BinaryOp::Or, Value::Bool(true)) => {
                        Ok(left)
                    }
                    _ => {
                        let right = self.eval(*right)?;
                        evaluate_binary(&left, &right, *op)
                    }
                }
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => match self.eval(*cond)? {
                Value::Bool(true) => self.eval(*then_branch),
                Value::Bool(false) => self.eval(*else_branch),
                other => Err(type_mismatch(&mold_ir::Type::Bool, &other.ty())),
            },
            ExprKind::Let { slot, init, body } => {
                let value = self.eval(*init)?;
                self.scope.push((*slot, value));
                let result = self.eval(*body);
                self.scope.pop();
                result
            }
            ExprKind::List(items) => {
                let ty = self.arena.ty(id);
                let Some(elem) = ty.elem().cloned() else {
                    return Err(type_mismatch(&mold_ir::Type::list(ty.clone()), ty));
                };
                let items = self
                    .arena
                    .list(*items)
                    .iter()
                    .map(|item| self.eval(*item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(elem, items))
            }
            ExprKind::Index { receiver, index } => {
                let receiver = self.eval(*receiver)?;
                let index = self.eval(*index)?;
                index_value(&receiver, &index)
            }
            ExprKind::Call { func, args } => {
                let args = self
                    .arena
                    .list(*args)
                    .iter()
                    .map(|arg| self.eval(*arg))
                    .collect::<Result<SmallVec<[Value; 2]>, _>>()?;
                call_builtin(*func, &args)
            }
        }
    }
}

#[cfg(test)]
mod tests;

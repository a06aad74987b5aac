//! Constant extraction.
//!
//! One validating pre-order walk serves both entry points. The walk is
//! parameterized by a [`Visit`] implementation: [`Rebuild`] copies the tree
//! into a fresh arena with constants turned into placeholder parameters,
//! [`Collect`] only records the constants. Sharing the walk is what makes
//! [`extract_values`] produce exactly the sequence [`extract`] does.

use mold_ir::stack::ensure_sufficient_stack;
use mold_ir::visitor::try_children;
use mold_ir::{ExprArena, ExprId, ExprKind, Lambda, Param, Type, Value};
use smallvec::SmallVec;

use crate::error::ExtractError;

/// Result of [`extract`].
#[derive(Clone, Debug)]
pub struct Extracted {
    /// The expression with every constant promoted to a trailing parameter.
    ///
    /// Parameters `0..n` are the original ones; parameter `n + i` stands
    /// for `values[i]`.
    pub skeleton: Lambda,
    /// The extracted constants, in promotion order.
    pub values: Vec<Value>,
}

/// Split `expr` into a constant-free skeleton and its constants.
///
/// Deterministic: structurally identical inputs (possibly different
/// instances) produce structurally identical skeletons and value sequences
/// of equal length and matching order.
pub fn extract(expr: &Lambda) -> Result<Extracted, ExtractError> {
    let arity = expr.arity();
    let rebuild = Rebuild {
        arena: ExprArena::with_capacity(expr.arena().len()),
        base: placeholder_base(arity),
        values: Vec::new(),
    };
    let (root, rebuild) = walk(expr, rebuild)?;

    let mut params = Vec::with_capacity(arity + rebuild.values.len());
    params.extend_from_slice(expr.params());
    params.extend(
        rebuild
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| Param::new(format!("${i}").as_str(), value.ty())),
    );

    Ok(Extracted {
        skeleton: Lambda::new(params, rebuild.arena, root),
        values: rebuild.values,
    })
}

/// The constants of `expr`, in the order [`extract`] would promote them.
///
/// Used on cache hits, where the skeleton is already compiled and only this
/// call's values are needed. Performs the same validation as [`extract`].
pub fn extract_values(expr: &Lambda) -> Result<Vec<Value>, ExtractError> {
    let (_, collect) = walk(expr, Collect { values: Vec::new() })?;
    Ok(collect.values)
}

/// Placeholder parameters are numbered after the original ones.
fn placeholder_base(arity: usize) -> u32 {
    u32::try_from(arity).unwrap_or(u32::MAX)
}

/// What the walk produces at each node.
trait Visit {
    type Id: Copy;

    /// A `Param` or `Local` leaf, already validated.
    fn leaf(&mut self, kind: &ExprKind, ty: &Type) -> Self::Id;

    /// A `Const` leaf, already validated.
    fn constant(&mut self, value: &Value, ty: &Type) -> Self::Id;

    /// A compound node whose children produced `children`, in canonical order.
    fn compound(&mut self, kind: &ExprKind, ty: &Type, children: &[Self::Id]) -> Self::Id;
}

struct Collect {
    values: Vec<Value>,
}

impl Visit for Collect {
    type Id = ();

    fn leaf(&mut self, _: &ExprKind, _: &Type) {}

    fn constant(&mut self, value: &Value, _: &Type) {
        self.values.push(value.clone());
    }

    fn compound(&mut self, _: &ExprKind, _: &Type, _: &[()]) {}
}

struct Rebuild {
    arena: ExprArena,
    /// Index of the first placeholder parameter.
    base: u32,
    values: Vec<Value>,
}

impl Visit for Rebuild {
    type Id = ExprId;

    fn leaf(&mut self, kind: &ExprKind, ty: &Type) -> ExprId {
        self.arena.push(kind.clone(), ty.clone())
    }

    fn constant(&mut self, value: &Value, ty: &Type) -> ExprId {
        let offset = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
        self.values.push(value.clone());
        self.arena
            .push(ExprKind::Param(self.base.saturating_add(offset)), ty.clone())
    }

    fn compound(&mut self, kind: &ExprKind, ty: &Type, children: &[ExprId]) -> ExprId {
        let kind = match (kind, children) {
            (ExprKind::Unary { op, .. }, &[operand]) => ExprKind::Unary { op: *op, operand },
            (ExprKind::Binary { op, .. }, &[left, right]) => ExprKind::Binary {
                op: *op,
                left,
                right,
            },
            (ExprKind::If { .. }, &[cond, then_branch, else_branch]) => ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            (ExprKind::Let { slot, .. }, &[init, body]) => ExprKind::Let {
                slot: *slot,
                init,
                body,
            },
            (ExprKind::List(_), items) => ExprKind::List(self.arena.push_list(items)),
            (ExprKind::Index { .. }, &[receiver, index]) => ExprKind::Index { receiver, index },
            (ExprKind::Call { func, .. }, args) => ExprKind::Call {
                func: *func,
                args: self.arena.push_list(args),
            },
            (kind, children) => unreachable!(
                "{} node rebuilt with {} children",
                kind.variant_name(),
                children.len()
            ),
        };
        self.arena.push(kind, ty.clone())
    }
}

/// Validate `expr` and drive `visit` over it in pre-order.
fn walk<V: Visit>(expr: &Lambda, visit: V) -> Result<(V::Id, V), ExtractError> {
    let arena = expr.arena();
    let root = expr.root();
    if arena.get_kind(root).is_none() {
        return Err(ExtractError::DanglingRoot {
            root,
            len: arena.len(),
        });
    }

    let mut walker = Walker {
        arena,
        arity: expr.arity(),
        scope: Vec::new(),
        visit,
    };
    let id = walker.node(root)?;
    Ok((id, walker.visit))
}

struct Walker<'a, V> {
    arena: &'a ExprArena,
    arity: usize,
    /// Let slots bound on the path from the root to the current node.
    scope: Vec<u32>,
    visit: V,
}

impl<V: Visit> Walker<'_, V> {
    /// `id` is known to be in bounds.
    fn node(&mut self, id: ExprId) -> Result<V::Id, ExtractError> {
        ensure_sufficient_stack(|| {
            let kind = self.arena.kind(id);
            let ty = self.arena.ty(id);
            match kind {
                ExprKind::Const(value) => {
                    let found = value.ty();
                    if found != *ty {
                        return Err(ExtractError::ConstTypeMismatch {
                            node: id,
                            expected: ty.clone(),
                            found,
                        });
                    }
                    Ok(self.visit.constant(value, ty))
                }
                ExprKind::Param(index) => {
                    if *index as usize >= self.arity {
                        return Err(ExtractError::UnboundParam {
                            node: id,
                            index: *index,
                            arity: self.arity,
                        });
                    }
                    Ok(self.visit.leaf(kind, ty))
                }
                ExprKind::Local(slot) => {
                    if !self.scope.contains(slot) {
                        return Err(ExtractError::UnboundLocal {
                            node: id,
                            slot: *slot,
                        });
                    }
                    Ok(self.visit.leaf(kind, ty))
                }
                _ => self.compound(id, kind, ty),
            }
        })
    }

    fn compound(
        &mut self,
        id: ExprId,
        kind: &ExprKind,
        ty: &Type,
    ) -> Result<V::Id, ExtractError> {
        let children =
            try_children(self.arena, kind).ok_or(ExtractError::DanglingList { node: id })?;

        let mut out: SmallVec<[V::Id; 3]> = SmallVec::with_capacity(children.len());
        for (position, &child) in children.iter().enumerate() {
            if child >= id {
                return Err(ExtractError::ForwardReference { parent: id, child });
            }
            // The let slot is in scope for the body (second child) only.
            let bound = match kind {
                ExprKind::Let { slot, .. } if position == 1 => {
                    self.scope.push(*slot);
                    true
                }
                _ => false,
            };
            let result = self.node(child);
            if bound {
                self.scope.pop();
            }
            out.push(result?);
        }

        Ok(self.visit.compound(kind, ty, &out))
    }
}

//! Expression arena.
//!
//! [`ExprArena`] uses struct-of-arrays layout: parallel `kinds` and `types`
//! arrays indexed by [`ExprId`], plus a flat `expr_lists` table for
//! variable-length child lists addressed by [`ExprRange`].

use crate::expr::ExprKind;
use crate::ids::{ExprId, ExprRange};
use crate::types::Type;

/// Convert a length to `u32`, panicking with context on overflow.
///
/// Arenas past `u32::MAX` nodes are not a supported configuration.
pub(crate) fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("too many {what}: {value} exceeds u32::MAX"))
}

/// Flat storage for the nodes of one expression tree.
///
/// # Index Spaces
///
/// - `kinds`/`types`: parallel arrays indexed by [`ExprId`]
/// - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    /// Node kinds (parallel with `types`).
    kinds: Vec<ExprKind>,
    /// Static node types (parallel with `kinds`).
    types: Vec<Type>,
    /// Flattened child lists for list literals and call arguments.
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(nodes),
            types: Vec::with_capacity(nodes),
            expr_lists: Vec::new(),
        }
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, kind: ExprKind, ty: Type) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        self.types.push(ty);
        id
    }

    /// Allocate a child list, returning its range.
    pub fn push_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u32(ids.len(), "list elements"))
    }

    /// Get the kind of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    /// Get the static type of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn ty(&self, id: ExprId) -> &Type {
        &self.types[id.index()]
    }

    /// Get the kind of a node, or `None` if `id` is out of bounds.
    #[inline]
    pub fn get_kind(&self, id: ExprId) -> Option<&ExprKind> {
        self.kinds.get(id.index())
    }

    /// Get the type of a node, or `None` if `id` is out of bounds.
    #[inline]
    pub fn get_ty(&self, id: ExprId) -> Option<&Type> {
        self.types.get(id.index())
    }

    /// Get the ids in a child list.
    ///
    /// # Panics
    ///
    /// Panics if `range` runs past the list table.
    #[inline]
    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Get the ids in a child list, or `None` if `range` runs past the table.
    pub fn get_list(&self, range: ExprRange) -> Option<&[ExprId]> {
        let start = range.start as usize;
        self.expr_lists.get(start..start.checked_add(range.len())?)
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Copy this arena, replacing each node's kind with `f(id, kind, ty)`.
    ///
    /// Node ids, types and child lists are preserved, so `f` may only turn
    /// leaves into leaves. Used to substitute parameters and to erase
    /// constant values without rebuilding the tree.
    pub fn map_kinds(&self, mut f: impl FnMut(ExprId, &ExprKind, &Type) -> ExprKind) -> Self {
        let kinds = self
            .kinds
            .iter()
            .zip(&self.types)
            .enumerate()
            .map(|(i, (kind, ty))| f(ExprId::new(to_u32(i, "expressions")), kind, ty))
            .collect();
        Self {
            kinds,
            types: self.types.clone(),
            expr_lists: self.expr_lists.clone(),
        }
    }
}

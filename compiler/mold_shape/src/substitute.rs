//! Parameter substitution.

use mold_ir::{ExprKind, Lambda, Param, Type, Value};

/// Replace parameter references with constants.
///
/// Every `Param(i)` node for which `replace(i, ty)` returns a value becomes a
/// `Const` node holding it; the rest are kept as they are. `params` becomes
/// the parameter list of the result, so callers substituting a suffix of the
/// parameters pass the remaining prefix. Node ids, types and the root are
/// preserved.
pub fn substitute_params(
    expr: &Lambda,
    params: Vec<Param>,
    mut replace: impl FnMut(u32, &Type) -> Option<Value>,
) -> Lambda {
    let arena = expr.arena().map_kinds(|_, kind, ty| match kind {
        ExprKind::Param(index) => match replace(*index, ty) {
            Some(value) => ExprKind::Const(value),
            None => kind.clone(),
        },
        _ => kind.clone(),
    });
    Lambda::new(params, arena, expr.root())
}

/// Put `values` back into a skeleton produced by [`extract`](crate::extract).
///
/// `original_arity` is the parameter count of the expression the skeleton
/// was extracted from. The result has the shape and the constants of that
/// expression.
pub fn reinsert(skeleton: &Lambda, original_arity: usize, values: &[Value]) -> Lambda {
    let params = skeleton.params()[..original_arity.min(skeleton.arity())].to_vec();
    substitute_params(skeleton, params, |index, _| {
        (index as usize)
            .checked_sub(original_arity)
            .and_then(|offset| values.get(offset))
            .cloned()
    })
}

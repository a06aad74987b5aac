use std::fmt;

use mold_ir::stack::ensure_sufficient_stack;
use mold_ir::{Type, Value};
use smallvec::SmallVec;

use crate::errors::{type_mismatch, wrong_arg_count, EvalResult};

/// Compiled code of one node.
pub(crate) type Code = Box<dyn Fn(&mut Frame<'_>) -> EvalResult + Send + Sync>;

/// Code that re-checks the native stack when it runs and when it is dropped.
///
/// A closure tree is as deep as the expression it came from, and dropping it
/// recurses through every level just like calling it does.
pub(crate) struct StackGuarded {
    inner: Code,
}

impl StackGuarded {
    pub(crate) fn new(inner: Code) -> Self {
        StackGuarded { inner }
    }

    pub(crate) fn run(&self, frame: &mut Frame<'_>) -> EvalResult {
        ensure_sufficient_stack(|| (self.inner)(frame))
    }
}

impl Drop for StackGuarded {
    fn drop(&mut self) {
        // `unit` is zero-sized, so boxing it does not allocate.
        fn unit(_: &mut Frame<'_>) -> EvalResult {
            Ok(Value::Unit)
        }

        let inner = std::mem::replace(&mut self.inner, Box::new(unit));
        ensure_sufficient_stack(move || drop(inner));
    }
}

/// Per-call state: the flat argument vector and one cell per let binding.
pub(crate) struct Frame<'a> {
    pub(crate) args: &'a [Value],
    pub(crate) cells: SmallVec<[Value; 4]>,
}

/// An executable function produced by lowering a skeleton.
///
/// # Calling Convention
///
/// Arguments form one flat vector: the extracted constant values first
/// (`0..value_count`), then the caller's arguments. The artifact holds no
/// constants of its own, so one artifact serves every expression of its
/// shape. Immutable and `Send + Sync`.
pub struct Artifact {
    param_types: Vec<Type>,
    value_count: usize,
    return_type: Type,
    cells: usize,
    code: Code,
}

impl Artifact {
    pub(crate) fn new(
        param_types: Vec<Type>,
        value_count: usize,
        return_type: Type,
        cells: usize,
        code: Code,
    ) -> Self {
        Artifact {
            param_types,
            value_count,
            return_type,
            cells,
            code,
        }
    }

    /// Length of the flat argument vector.
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// Number of leading slots that carry extracted constants.
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    /// Types of the flat argument vector, in calling-convention order.
    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// Run the artifact on a flat argument vector.
    ///
    /// The vector's length and element types are checked first.
    pub fn call(&self, args: &[Value]) -> EvalResult {
        if args.len() != self.arity() {
            return Err(wrong_arg_count("", self.arity(), args.len()));
        }
        for (arg, ty) in args.iter().zip(&self.param_types) {
            if !arg.has_type(ty) {
                return Err(type_mismatch(ty, &arg.ty()));
            }
        }

        let mut frame = Frame {
            args,
            cells: SmallVec::from_elem(Value::Unit, self.cells),
        };
        (self.code)(&mut frame)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("param_types", &self.param_types)
            .field("value_count", &self.value_count)
            .field("return_type", &self.return_type)
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}

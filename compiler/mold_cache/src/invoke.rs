//! Invocation adapter: joins an expression's constants with call arguments.

use mold_eval::Artifact;
use mold_ir::Value;
use smallvec::SmallVec;

use crate::error::Error;

/// Call `artifact` with `values ++ arguments`.
///
/// `declared` is the parameter count of the expression the caller compiled.
/// A wrong argument count fails before the artifact runs; runtime failures
/// come back as [`Error::Evaluation`] unchanged.
pub fn invoke(
    artifact: &Artifact,
    values: &[Value],
    arguments: &[Value],
    declared: usize,
) -> Result<Value, Error> {
    if arguments.len() != declared {
        return Err(Error::ArityMismatch {
            expected: declared,
            got: arguments.len(),
        });
    }

    let mut flat: SmallVec<[Value; 8]> = SmallVec::with_capacity(values.len() + arguments.len());
    flat.extend(values.iter().cloned());
    flat.extend(arguments.iter().cloned());
    Ok(artifact.call(&flat)?)
}

#[cfg(test)]
mod tests;

//! Stack growth for recursive tree traversals.
//!
//! Extraction, hashing, comparison, lowering and interpretation all recurse
//! over expression trees whose depth is controlled by the caller. Each
//! recursive step goes through [`ensure_sufficient_stack`], which grows the
//! stack on demand (native targets) instead of overflowing.

/// If less than this much stack remains, grow before recursing.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment.
const STACK_GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

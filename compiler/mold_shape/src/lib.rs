//! Mold Shape - separating an expression's structure from its values.
//!
//! # Pipeline Position
//!
//! ```text
//! Lambda ──► extract ──► (skeleton, values) ──► canonicalize ──► CanonicalKey
//!                                                                   │
//!                                   mold_cache: lookup-or-compile ◄─┘
//! ```
//!
//! - [`extract`] promotes every constant leaf to a trailing formal parameter
//!   and returns the constants in promotion order. [`extract_values`] returns
//!   the same sequence without building the skeleton (the cache-hit path).
//! - [`canonicalize`] replaces those trailing parameters with type-default
//!   constants, giving a key that depends on shape only.
//! - [`shapes_equal`] / [`shape_hash`] define "same shape": same node kinds,
//!   operators, types and parameter positions, regardless of constant values.
//!   [`CanonicalKey`] implements `Eq` and `Hash` through them.
//!
//! Every constant is extracted, inline literals and captured values alike.
//! A constant left in the skeleton would end up inside a compiled artifact
//! that the comparer then shares with expressions holding different values.

mod canonical;
mod compare;
mod error;
mod extract;
mod substitute;

pub use canonical::{canonicalize, key_and_values, CanonicalKey};
pub use compare::{shape_hash, shapes_equal};
pub use error::ExtractError;
pub use extract::{extract, extract_values, Extracted};
pub use substitute::{reinsert, substitute_params};

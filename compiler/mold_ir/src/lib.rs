//! Mold IR - expression trees for the mold memoizing compiler.
//!
//! This crate contains the data structures every other `mold_*` crate shares:
//! - [`Type`] and [`Value`]: the static types and runtime values of expressions
//! - [`ExprArena`]: flat, index-addressed storage for expression nodes
//! - [`Lambda`]: a parameterized expression (formal parameters + body)
//! - [`ExprBuilder`]: the ergonomic way to construct a [`Lambda`]
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: no `Box<Expr>`, children are [`ExprId`] indices
//! - **Children First**: a node's children always have smaller ids than the
//!   node itself, so a well-formed arena is acyclic by construction
//! - **Positional Parameters**: a parameter reference is an index into the
//!   lambda's parameter list; parameter names are for display only
//!
//! Every node carries its static [`Type`]. Shape comparison (`mold_shape`)
//! looks at node kinds, operators and types, and ignores the values stored in
//! [`ExprKind::Const`] leaves.

mod arena;
mod builder;
mod expr;
mod format;
mod ids;
mod lambda;
mod name;
mod ops;
pub mod stack;
mod types;
mod value;
pub mod visitor;

pub use arena::ExprArena;
pub use builder::ExprBuilder;
pub use expr::ExprKind;
pub use ids::{ExprId, ExprRange};
pub use lambda::{Lambda, Param};
pub use name::Name;
pub use ops::{BinaryOp, Builtin, UnaryOp};
pub use types::Type;
pub use value::{ListValue, Value};

//! Human-readable rendering of lambdas, for diagnostics and trace output.
//!
//! `|x: int, k: int| ((x * 2) + k)`. Every compound node is parenthesized,
//! so the output is unambiguous without precedence rules. Malformed trees
//! render the bad reference inline (`<dangling #7>`) instead of panicking.

use std::fmt::{self, Write};

use crate::arena::ExprArena;
use crate::expr::ExprKind;
use crate::ids::{ExprId, ExprRange};
use crate::lambda::{Lambda, Param};
use crate::stack::ensure_sufficient_stack;

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('|')?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
        }
        f.write_str("| ")?;
        Printer {
            arena: self.arena(),
            params: self.params(),
        }
        .node(f, self.root())
    }
}

struct Printer<'a> {
    arena: &'a ExprArena,
    params: &'a [Param],
}

impl Printer<'_> {
    fn node(&self, f: &mut fmt::Formatter<'_>, id: ExprId) -> fmt::Result {
        let Some(kind) = self.arena.get_kind(id) else {
            return write!(f, "<dangling #{}>", id.raw());
        };
        ensure_sufficient_stack(|| match kind {
            ExprKind::Const(value) => write!(f, "{value}"),
            ExprKind::Param(index) => match self.params.get(*index as usize) {
                Some(param) => write!(f, "{}", param.name),
                None => write!(f, "<param #{index}>"),
            },
            ExprKind::Local(slot) => write!(f, "l{slot}"),
            ExprKind::Unary { op, operand } => {
                write!(f, "({}", op.as_symbol())?;
                self.node(f, *operand)?;
                f.write_char(')')
            }
            ExprKind::Binary { op, left, right } => {
                f.write_char('(')?;
                self.node(f, *left)?;
                write!(f, " {} ", op.as_symbol())?;
                self.node(f, *right)?;
                f.write_char(')')
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f.write_str("(if ")?;
                self.node(f, *cond)?;
                f.write_str(" then ")?;
                self.node(f, *then_branch)?;
                f.write_str(" else ")?;
                self.node(f, *else_branch)?;
                f.write_char(')')
            }
            ExprKind::Let { slot, init, body } => {
                write!(f, "(let l{slot} = ")?;
                self.node(f, *init)?;
                f.write_str(" in ")?;
                self.node(f, *body)?;
                f.write_char(')')
            }
            ExprKind::List(items) => {
                f.write_char('[')?;
                self.list(f, *items)?;
                f.write_char(']')
            }
            ExprKind::Index { receiver, index } => {
                self.node(f, *receiver)?;
                f.write_char('[')?;
                self.node(f, *index)?;
                f.write_char(']')
            }
            ExprKind::Call { func, args } => {
                write!(f, "{}(", func.name())?;
                self.list(f, *args)?;
                f.write_char(')')
            }
        })
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, range: ExprRange) -> fmt::Result {
        let Some(ids) = self.arena.get_list(range) else {
            return write!(f, "<dangling {range:?}>");
        };
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.node(f, *id)?;
        }
        Ok(())
    }
}

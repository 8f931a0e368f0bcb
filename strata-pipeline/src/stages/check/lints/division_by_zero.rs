//! Lint for division by a constant zero.

use strata_core::SourceFile;
use strata_syntax::{BinaryOp, Expr, SyntaxTree};

use super::super::Lint;
use crate::Diagnostic;

/// Lint that errors on `x / 0`, including `x / (0)` and `x / -0`.
pub struct DivisionByZeroLint;

impl Lint for DivisionByZeroLint {
    fn name(&self) -> &'static str {
        "division-by-zero"
    }

    fn description(&self) -> &'static str {
        "Detect division by a constant zero"
    }

    fn check(&self, source: &SourceFile, tree: &SyntaxTree, diagnostics: &mut Vec<Diagnostic>) {
        tree.walk_exprs(|expr| {
            if let Expr::Binary {
                op: BinaryOp::Div,
                rhs,
                ..
            } = expr
                && rhs.constant() == Some(0)
            {
                diagnostics.push(
                    Diagnostic::error(self.name(), format!("division by zero in `{}`", expr))
                        .at(source.location(rhs.span().start)),
                );
            }
        });
    }
}

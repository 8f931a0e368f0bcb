//! Lint for names used before they are bound.

use std::collections::HashSet;

use strata_core::SourceFile;
use strata_syntax::{Expr, Stmt, SyntaxTree};

use super::super::Lint;
use crate::Diagnostic;

/// Lint that warns about names read before any `let` binds them.
///
/// A `let` binds its name only after its value, so `let a = a` warns.
pub struct UndefinedNameLint;

impl Lint for UndefinedNameLint {
    fn name(&self) -> &'static str {
        "undefined-name"
    }

    fn description(&self) -> &'static str {
        "Detect names used before they are bound"
    }

    fn check(&self, source: &SourceFile, tree: &SyntaxTree, diagnostics: &mut Vec<Diagnostic>) {
        let mut bound: HashSet<&str> = HashSet::new();

        for stmt in &tree.statements {
            stmt.expr().walk(&mut |expr| {
                if let Expr::Name { ident } = expr
                    && !bound.contains(ident.name.as_str())
                {
                    diagnostics.push(
                        Diagnostic::warning(
                            self.name(),
                            format!("name '{}' is used before it is bound", ident.name),
                        )
                        .at(source.location(ident.span.start)),
                    );
                }
            });

            if let Stmt::Let { name, .. } = stmt {
                bound.insert(&name.name);
            }
        }
    }
}

//! Lint for deeply nested expressions.

use strata_core::SourceFile;
use strata_syntax::SyntaxTree;

use super::super::Lint;
use crate::Diagnostic;

/// Lint that warns about statements whose expression nests deeper than
/// `max_depth`.
pub struct NestingDepthLint {
    max_depth: usize,
}

impl NestingDepthLint {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for NestingDepthLint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

impl Lint for NestingDepthLint {
    fn name(&self) -> &'static str {
        "nesting-depth"
    }

    fn description(&self) -> &'static str {
        "Detect expressions nested deeper than the configured limit"
    }

    fn check(&self, source: &SourceFile, tree: &SyntaxTree, diagnostics: &mut Vec<Diagnostic>) {
        for stmt in &tree.statements {
            let depth = stmt.expr().depth();
            if depth > self.max_depth {
                diagnostics.push(
                    Diagnostic::warning(
                        self.name(),
                        format!(
                            "expression nests {} levels deep (limit is {})",
                            depth, self.max_depth
                        ),
                    )
                    .at(source.location(stmt.span().start)),
                );
            }
        }
    }
}

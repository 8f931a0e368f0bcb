//! Lint trait for syntax tree checks.

use serde::Serialize;
use strata_core::SourceFile;
use strata_syntax::SyntaxTree;

use crate::Diagnostic;

/// Name and description of a lint, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A lint that checks one parsed unit for issues.
pub trait Lint: Send + Sync {
    /// The name of this lint.
    fn name(&self) -> &'static str;

    /// What this lint looks for.
    fn description(&self) -> &'static str;

    /// Check the tree parsed from `source` and add any diagnostics.
    ///
    /// The stage running the lint overwrites each diagnostic's phase with
    /// its own name.
    fn check(&self, source: &SourceFile, tree: &SyntaxTree, diagnostics: &mut Vec<Diagnostic>);

    fn info(&self) -> LintInfo {
        LintInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}

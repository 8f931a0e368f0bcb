//! Check stage - runs lints on parsed units.

mod lint;
pub mod lints;

use std::sync::Arc;

use eyre::Result;
pub use lint::{Lint, LintInfo};
pub use lints::{DivisionByZeroLint, NestingDepthLint, UndefinedNameLint};
use serde::{Deserialize, Serialize};

use crate::{
    CompilationUnit, Diagnostic, PhaseDescriptor, Session, StageError,
    stage::{Stage, StageContext},
};

/// Options for [`CheckStage`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Deepest expression nesting allowed before a warning.
    pub max_depth: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_depth: NestingDepthLint::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Stage that checks parsed units using configurable lints.
///
/// Units that were never parsed are reported as errors. The stage fails when
/// it reported any error; warnings are allowed.
pub struct CheckStage {
    ctx: StageContext,
    lints: Vec<Box<dyn Lint>>,
}

impl CheckStage {
    /// Create a check stage with the built-in lints.
    pub fn new(
        session: Arc<Session>,
        descriptor: Arc<PhaseDescriptor>,
        options: &CheckOptions,
    ) -> Self {
        Self::empty(session, descriptor)
            .with_lint(DivisionByZeroLint)
            .with_lint(UndefinedNameLint)
            .with_lint(NestingDepthLint::new(options.max_depth))
    }

    /// Create a check stage with no lints.
    pub fn empty(session: Arc<Session>, descriptor: Arc<PhaseDescriptor>) -> Self {
        Self {
            ctx: StageContext::new(session, descriptor),
            lints: Vec::new(),
        }
    }

    /// Add a custom lint to the check stage.
    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    /// Get the names of all lints that will be run.
    pub fn lint_names(&self) -> Vec<&'static str> {
        self.lints.iter().map(|l| l.name()).collect()
    }

    /// Get information about all lints that will be run.
    pub fn lint_info(&self) -> Vec<LintInfo> {
        self.lints.iter().map(|l| l.info()).collect()
    }
}

impl Stage for CheckStage {
    fn context(&self) -> &StageContext {
        &self.ctx
    }

    fn description(&self) -> &'static str {
        "Lint parsed units and report diagnostics"
    }

    fn apply(&self, units: &mut [CompilationUnit]) -> Result<()> {
        let span = tracing::info_span!("stage", name = %self.name(), units = units.len());
        let _enter = span.enter();

        let mut errors = 0;
        for unit in units.iter() {
            let mut diagnostics = Vec::new();
            match unit.tree() {
                Some(tree) => {
                    for lint in &self.lints {
                        lint.check(unit.source(), tree, &mut diagnostics);
                    }
                }
                None => diagnostics.push(
                    Diagnostic::error(self.name(), "unit has not been parsed")
                        .at(unit.source().name()),
                ),
            }

            tracing::debug!(unit = %unit.source(), found = diagnostics.len(), "checked unit");
            for mut diagnostic in diagnostics {
                diagnostic.phase = self.name().to_string();
                if diagnostic.severity.is_error() {
                    errors += 1;
                }
                self.session().report(diagnostic);
            }
        }

        if errors > 0 {
            return Err(StageError::Diagnostics {
                stage: self.name().to_string(),
                count: errors,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_core::SourceFile;
    use strata_syntax::SyntaxTree;

    use super::*;

    fn descriptor() -> Arc<PhaseDescriptor> {
        Arc::new(PhaseDescriptor::new("check", 2))
    }

    fn parsed(name: &str, text: &str) -> CompilationUnit {
        let source = SourceFile::new(name, text);
        let tree = strata_syntax::parse(&source).expect("test source should parse");
        let mut unit = CompilationUnit::new(source);
        unit.set_tree(tree);
        unit
    }

    #[test]
    fn test_default_lints() {
        let stage = CheckStage::new(
            Arc::new(Session::new()),
            descriptor(),
            &CheckOptions::default(),
        );
        assert_eq!(
            stage.lint_names(),
            vec!["division-by-zero", "undefined-name", "nesting-depth"]
        );
        assert!(stage.lint_info().iter().all(|i| !i.description.is_empty()));
    }

    #[test]
    fn test_clean_units() {
        let session = Arc::new(Session::new());
        let stage = CheckStage::new(session.clone(), descriptor(), &CheckOptions::default());
        let mut units = vec![parsed("a.st", "let a = 1\na + 2")];

        stage.apply(&mut units).expect("check should succeed");
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let session = Arc::new(Session::new());
        let stage = CheckStage::new(session.clone(), descriptor(), &CheckOptions::default());
        let mut units = vec![parsed("a.st", "missing + 1")];

        stage.apply(&mut units).expect("warnings are allowed");
        assert_eq!(session.warning_count(), 1);
    }

    #[test]
    fn test_errors_fail_the_stage() {
        let session = Arc::new(Session::new());
        let stage = CheckStage::new(session.clone(), descriptor(), &CheckOptions::default());
        let mut units = vec![
            parsed("a.st", "1 / 0"),
            CompilationUnit::new(SourceFile::new("b.st", "2")),
        ];

        let err = stage.apply(&mut units).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::Diagnostics { count: 2, .. })
        ));
        let diagnostics = session.diagnostics();
        assert_eq!(diagnostics[1].message, "unit has not been parsed");
        assert_eq!(diagnostics[1].location.as_deref(), Some("b.st"));
    }

    #[test]
    fn test_diagnostics_carry_stage_name() {
        let session = Arc::new(Session::new());
        let stage = CheckStage::new(
            session.clone(),
            Arc::new(PhaseDescriptor::new("lint", 3)),
            &CheckOptions::default(),
        );
        let mut units = vec![
            parsed("a.st", "missing / 0"),
            CompilationUnit::new(SourceFile::new("b.st", "2")),
        ];

        stage.apply(&mut units).unwrap_err();

        let diagnostics = session.diagnostics();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.phase == "lint"));
    }

    #[test]
    fn test_custom_lint() {
        struct EmptyUnitLint;
        impl Lint for EmptyUnitLint {
            fn name(&self) -> &'static str {
                "empty-unit"
            }
            fn description(&self) -> &'static str {
                "Flags units with no statements"
            }
            fn check(
                &self,
                source: &SourceFile,
                tree: &SyntaxTree,
                diagnostics: &mut Vec<Diagnostic>,
            ) {
                if tree.is_empty() {
                    diagnostics.push(Diagnostic::info("check", "empty unit").at(source.name()));
                }
            }
        }

        let session = Arc::new(Session::new());
        let stage = CheckStage::empty(session.clone(), descriptor()).with_lint(EmptyUnitLint);
        let mut units = vec![parsed("a.st", "# nothing here\n")];

        stage.apply(&mut units).expect("info does not fail");
        assert_eq!(session.diagnostics().len(), 1);
        assert_eq!(stage.lint_names(), vec!["empty-unit"]);
    }
}

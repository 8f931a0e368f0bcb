//! Parse stage - turns every unit's source into its syntax tree.

use std::{sync::Arc, time::Duration};

use eyre::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strata_core::{CancelToken, Interrupt, SourceFile};
use strata_syntax::SyntaxError;

use crate::{
    CompilationUnit, Diagnostic, PhaseDescriptor, Session, StageError,
    collaborator::{Parse, ParserFactory},
    stage::{Stage, StageContext},
};

/// How the stage walks the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One unit at a time, in batch order, timed through the session's
    /// shared scope.
    #[default]
    Sequential,
    /// Units spread over a worker pool, each timed with its own scope.
    /// Timing and diagnostic order across units is unspecified.
    Parallel,
}

/// What to do when a unit fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Report every failure as a diagnostic, parse the rest, then fail.
    Collect,
}

/// Options for [`ParserStage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    pub mode: ExecutionMode,
    /// Worker count in parallel mode; 0 picks one per CPU.
    pub workers: usize,
    pub on_error: FailurePolicy,
    /// Use a recovering parser that skips malformed statements.
    pub recover: bool,
    /// Upper bound on the time the whole stage may take.
    pub timeout_ms: Option<u64>,
}

impl ParseOptions {
    /// Parse on `workers` threads (0 for one per CPU).
    pub fn parallel(mut self, workers: usize) -> Self {
        self.mode = ExecutionMode::Parallel;
        self.workers = workers;
        self
    }

    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.on_error = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    fn deadline(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Stage that parses every unit with a fresh parser.
///
/// For each unit, in batch order, the stage opens a timing scope, builds a
/// parser for the unit's source, parses, stores the tree as the unit's body
/// and closes the scope with the label `parsed <source>` (or
/// `failed <source>`). Units are parsed independently of each other.
///
/// A parse failure stops the traversal and is returned; units before it keep
/// their trees and the failing unit and those after it stay unparsed. With
/// [`FailurePolicy::Collect`] the stage instead keeps going and fails at the
/// end. Problems a recovering parser skipped over are reported to the
/// session without failing the stage.
pub struct ParserStage<F> {
    ctx: StageContext,
    factory: F,
    options: ParseOptions,
    cancel: CancelToken,
}

impl<F: ParserFactory> ParserStage<F> {
    pub fn new(
        session: Arc<Session>,
        descriptor: Arc<PhaseDescriptor>,
        factory: F,
        options: ParseOptions,
    ) -> Self {
        Self {
            ctx: StageContext::new(session, descriptor),
            factory,
            options,
            cancel: CancelToken::new(),
        }
    }

    /// Stop parsing when `cancel` fires.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn apply_sequential(
        &self,
        units: &mut [CompilationUnit],
        cancel: &CancelToken,
    ) -> Result<(), StageError> {
        let session = self.ctx.session();
        let mut failed = Vec::new();

        for unit in units.iter_mut() {
            if let Err(reason) = cancel.check() {
                return Err(self.interrupted(unit.source(), reason));
            }

            tracing::debug!(unit = %unit.source(), "parsing unit");
            session.start()?;
            let result = self.parse_unit(unit, cancel);
            session.stop(timing_label(unit.source(), result.is_ok()))?;

            if let Err(error) = result {
                if error.interrupt().is_none() && self.options.on_error == FailurePolicy::Collect {
                    session.report(self.diagnostic(unit.source(), &error));
                    failed.push(unit.source().name().to_string());
                    continue;
                }
                return Err(self.failure(unit.source(), error));
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StageError::Failures { failed })
        }
    }

    fn apply_parallel(
        &self,
        units: &mut [CompilationUnit],
        cancel: &CancelToken,
    ) -> Result<(), StageError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("strata-parse-{}", i))
            .build()?;

        // Stops the remaining workers after a fatal failure without
        // cancelling the caller's token.
        let halt = CancelToken::new();
        let fail_fast = self.options.on_error == FailurePolicy::FailFast;
        let session = self.ctx.session();

        let outcomes: Vec<Outcome> = pool.install(|| {
            units
                .par_iter_mut()
                .map(|unit| {
                    let source = unit.source().clone();
                    if halt.is_cancelled() {
                        return Outcome::Skipped;
                    }
                    if let Err(reason) = cancel.check() {
                        halt.cancel();
                        return Outcome::Interrupted(source, reason);
                    }

                    tracing::debug!(unit = %source, "parsing unit");
                    let scope = session.scope();
                    let result = self.parse_unit(unit, cancel);
                    scope.finish(timing_label(&source, result.is_ok()));

                    match result {
                        Ok(()) => Outcome::Parsed,
                        Err(error) => {
                            if fail_fast || error.interrupt().is_some() {
                                halt.cancel();
                            }
                            Outcome::Failed(source, error)
                        }
                    }
                })
                .collect()
        });

        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Parsed | Outcome::Skipped => {}
                Outcome::Interrupted(source, reason) => {
                    return Err(self.interrupted(&source, reason));
                }
                Outcome::Failed(source, error) => {
                    if fail_fast || error.interrupt().is_some() {
                        return Err(self.failure(&source, error));
                    }
                    session.report(self.diagnostic(&source, &error));
                    failed.push(source.name().to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StageError::Failures { failed })
        }
    }

    /// Parse one unit and store its tree. Touches no other unit.
    fn parse_unit(
        &self,
        unit: &mut CompilationUnit,
        cancel: &CancelToken,
    ) -> Result<(), SyntaxError> {
        let mut parser = self.factory.parser(unit.source(), cancel);
        let output = parser.parse()?;

        for error in &output.errors {
            self.ctx
                .session()
                .report(self.diagnostic(unit.source(), error));
        }
        unit.set_tree(output.tree);
        Ok(())
    }

    fn diagnostic(&self, source: &SourceFile, error: &SyntaxError) -> Diagnostic {
        let location = match error.offset() {
            Some(offset) => source.location(offset),
            None => source.name().to_string(),
        };
        Diagnostic::error(self.name(), error.to_string()).at(location)
    }

    fn failure(&self, source: &SourceFile, error: SyntaxError) -> StageError {
        match error.interrupt() {
            Some(reason) => self.interrupted(source, reason),
            None => StageError::Parse {
                unit: source.name().to_string(),
                source: error,
            },
        }
    }

    fn interrupted(&self, source: &SourceFile, reason: Interrupt) -> StageError {
        StageError::Interrupted {
            stage: self.name().to_string(),
            unit: source.name().to_string(),
            reason,
        }
    }
}

impl<F: ParserFactory> Stage for ParserStage<F> {
    fn context(&self) -> &StageContext {
        &self.ctx
    }

    fn description(&self) -> &'static str {
        "Parse each unit's source into its syntax tree"
    }

    fn apply(&self, units: &mut [CompilationUnit]) -> Result<()> {
        let span = tracing::info_span!("stage", name = %self.name(), units = units.len());
        let _enter = span.enter();

        let cancel = match self.options.deadline() {
            Some(timeout) => self.cancel.with_timeout(timeout),
            None => self.cancel.clone(),
        };

        match self.options.mode {
            ExecutionMode::Sequential => self.apply_sequential(units, &cancel)?,
            ExecutionMode::Parallel => self.apply_parallel(units, &cancel)?,
        }
        Ok(())
    }
}

enum Outcome {
    Parsed,
    Skipped,
    Interrupted(SourceFile, Interrupt),
    Failed(SourceFile, SyntaxError),
}

fn timing_label(source: &SourceFile, parsed: bool) -> String {
    if parsed {
        format!("parsed {}", source)
    } else {
        format!("failed {}", source)
    }
}

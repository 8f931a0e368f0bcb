//! Error types for sessions, stages and pipelines.

use strata_core::Interrupt;
use strata_syntax::SyntaxError;
use thiserror::Error;

/// Misuse of the session's shared timing scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("timing scope already open (started for a previous unit and never stopped)")]
    ScopeAlreadyOpen,
    #[error("no timing scope is open to stop (label '{label}')")]
    NoOpenScope { label: String },
}

/// Failure of a stage's `apply`.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to parse '{unit}'")]
    Parse {
        unit: String,
        #[source]
        source: SyntaxError,
    },

    #[error("{} unit(s) failed to parse: {}", failed.len(), failed.join(", "))]
    Failures { failed: Vec<String> },

    #[error("stage '{stage}' stopped before '{unit}': {reason}")]
    Interrupted {
        stage: String,
        unit: String,
        reason: Interrupt,
    },

    #[error("{count} error(s) reported by stage '{stage}'")]
    Diagnostics { stage: String, count: usize },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to start parse workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Problems found while assembling a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("stage '{stage}' (#{id}) must come after '{previous}' (#{previous_id})")]
    OutOfOrder {
        stage: String,
        id: u32,
        previous: String,
        previous_id: u32,
    },

    #[error("unknown stage '{0}' (expected one of: parse, check)")]
    UnknownStage(String),
}

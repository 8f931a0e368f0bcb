//! The pipeline stage contract.

use std::{fmt, str::FromStr, sync::Arc};

use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::{
    CompilationUnit, PhaseDescriptor, Session, SyntaxFactory,
    error::PipelineError,
    stages::{CheckOptions, CheckStage, ParseOptions, ParserStage},
};

/// What every stage is bound to: the run's session and its phase identity.
#[derive(Debug, Clone)]
pub struct StageContext {
    session: Arc<Session>,
    descriptor: Arc<PhaseDescriptor>,
}

impl StageContext {
    pub fn new(session: Arc<Session>, descriptor: Arc<PhaseDescriptor>) -> Self {
        Self {
            session,
            descriptor,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn descriptor(&self) -> &PhaseDescriptor {
        &self.descriptor
    }
}

/// Information about a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    /// The phase name.
    pub name: String,
    /// The phase ordering id.
    pub id: u32,
    /// A human-readable description.
    pub description: &'static str,
}

/// One named, ordered transformation step of the compiler.
///
/// A stage is applied once per run to the whole batch of units. Its effects
/// are the in-place changes it makes to those units and what it reports to
/// the session; it must not keep references to units after `apply` returns.
///
/// Built-in stages:
/// - `ParserStage` - parses every unit's source into its syntax tree
/// - `CheckStage` - lints parsed trees and reports diagnostics
pub trait Stage: Send + Sync {
    /// The session and descriptor this stage was built with.
    fn context(&self) -> &StageContext;

    /// A human-readable description of what this stage does.
    fn description(&self) -> &'static str;

    /// Apply this stage to the given units, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage fails fatally. Non-fatal issues are
    /// reported to the session as diagnostics instead.
    fn apply(&self, units: &mut [CompilationUnit]) -> Result<()>;

    fn descriptor(&self) -> &PhaseDescriptor {
        self.context().descriptor()
    }

    fn session(&self) -> &Session {
        self.context().session()
    }

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Get information about this stage.
    fn info(&self) -> StageInfo {
        StageInfo {
            name: self.name().to_string(),
            id: self.descriptor().id(),
            description: self.description(),
        }
    }
}

/// Per-stage options, keyed by stage kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StageSettings {
    pub parse: ParseOptions,
    pub check: CheckOptions,
}

/// The closed set of stages a pipeline can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Parse,
    Check,
}

impl StageKind {
    pub const ALL: [StageKind; 2] = [StageKind::Parse, StageKind::Check];

    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Parse => "parse",
            StageKind::Check => "check",
        }
    }

    /// Build the stage for this kind as phase number `id`.
    pub fn build(self, session: Arc<Session>, id: u32, settings: &StageSettings) -> Box<dyn Stage> {
        let descriptor = Arc::new(PhaseDescriptor::new(self.name(), id));
        match self {
            StageKind::Parse => {
                let factory = if settings.parse.recover {
                    SyntaxFactory::recovering()
                } else {
                    SyntaxFactory::default()
                };
                Box::new(ParserStage::new(
                    session,
                    descriptor,
                    factory,
                    settings.parse.clone(),
                ))
            }
            StageKind::Check => Box::new(CheckStage::new(session, descriptor, &settings.check)),
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PipelineError::UnknownStage(s.to_string()))
    }
}

//! Pipeline orchestrator.

use std::sync::Arc;

use eyre::Result;

use crate::{
    CompilationUnit, Plugin, Session,
    error::PipelineError,
    stage::{Stage, StageInfo, StageKind, StageSettings},
};

/// The compilation pipeline orchestrator.
///
/// The pipeline applies its stages to a batch of units in the order they were
/// added, calling plugin hooks before and after each stage. Stage ids must
/// strictly increase along the pipeline.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::assemble(&session, &[StageKind::Parse, StageKind::Check], &settings)
///     .plugin(TimingPlugin::new());
///
/// pipeline.run(&mut units)?;
/// ```
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the stages named by `kinds`, numbered from 1 in order.
    pub fn assemble(session: &Arc<Session>, kinds: &[StageKind], settings: &StageSettings) -> Self {
        kinds
            .iter()
            .zip(1..)
            .fold(Self::new(), |pipeline, (kind, id)| {
                pipeline.boxed_stage(kind.build(session.clone(), id, settings))
            })
    }

    /// Add a stage to run after the ones already added.
    pub fn stage(self, stage: impl Stage + 'static) -> Self {
        self.boxed_stage(Box::new(stage))
    }

    pub fn boxed_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Add a plugin to receive stage lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Check that stage ids strictly increase along the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OutOfOrder`] naming the first stage whose id
    /// is not greater than its predecessor's.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for pair in self.stages.windows(2) {
            let (previous, stage) = (pair[0].descriptor(), pair[1].descriptor());
            if stage.id() <= previous.id() {
                return Err(PipelineError::OutOfOrder {
                    stage: stage.name().to_string(),
                    id: stage.id(),
                    previous: previous.name().to_string(),
                    previous_id: previous.id(),
                });
            }
        }
        Ok(())
    }

    /// Get information about every stage, in run order.
    pub fn stage_info(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|s| s.info()).collect()
    }

    /// Apply every stage to `units`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is out of order, if any stage fails
    /// fatally, or if a plugin aborts. Later stages are not applied.
    pub fn run(&self, units: &mut [CompilationUnit]) -> Result<()> {
        self.validate()?;

        for stage in &self.stages {
            self.run_stage(stage.as_ref(), units)?;
        }

        Ok(())
    }

    /// Apply a single stage with plugin hooks.
    fn run_stage(&self, stage: &dyn Stage, units: &mut [CompilationUnit]) -> Result<()> {
        tracing::debug!(stage = stage.name(), id = stage.descriptor().id(), "running stage");

        for plugin in &self.plugins {
            plugin.on_before_stage(stage.context(), units)?;
        }

        stage.apply(units)?;

        for plugin in &self.plugins {
            plugin.on_after_stage(stage.context(), units)?;
        }

        Ok(())
    }
}

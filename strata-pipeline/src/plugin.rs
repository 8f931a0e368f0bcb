//! Pipeline plugin trait for extensibility.

use std::{sync::Arc, time::Instant};

use eyre::Result;
use parking_lot::Mutex;

use crate::{CompilationUnit, session::Timing, stage::StageContext};

/// A plugin that can hook into the pipeline.
///
/// Plugins receive callbacks before and after each stage is applied, with
/// the stage's context and a read-only view of the batch.
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called before a stage is applied.
    ///
    /// # Errors
    ///
    /// Return an error to abort the pipeline.
    #[allow(unused_variables)]
    fn on_before_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        Ok(())
    }

    /// Called after a stage completes successfully.
    ///
    /// # Errors
    ///
    /// Return an error to abort the pipeline.
    #[allow(unused_variables)]
    fn on_after_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        Ok(())
    }
}

/// Shared plugins, so a caller can keep a handle to read results after a run.
impl<P: Plugin + ?Sized> Plugin for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_before_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        (**self).on_before_stage(ctx, units)
    }

    fn on_after_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        (**self).on_after_stage(ctx, units)
    }
}

/// Records how long each whole stage took, as `stage <name>` timings.
#[derive(Debug, Default)]
pub struct TimingPlugin {
    started: Mutex<Option<Instant>>,
}

impl TimingPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for TimingPlugin {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn on_before_stage(&self, _ctx: &StageContext, _units: &[CompilationUnit]) -> Result<()> {
        *self.started.lock() = Some(Instant::now());
        Ok(())
    }

    fn on_after_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        if let Some(started) = self.started.lock().take() {
            let elapsed = started.elapsed();
            tracing::info!(
                stage = ctx.descriptor().name(),
                units = units.len(),
                ?elapsed,
                "stage finished"
            );
            ctx.session().record(Timing {
                label: format!("stage {}", ctx.descriptor().name()),
                elapsed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PhaseDescriptor, Session};

    #[test]
    fn test_timing_plugin_records_stage() {
        let session = Arc::new(Session::new());
        let ctx = StageContext::new(session.clone(), Arc::new(PhaseDescriptor::new("parse", 1)));
        let plugin = TimingPlugin::new();

        plugin.on_before_stage(&ctx, &[]).unwrap();
        plugin.on_after_stage(&ctx, &[]).unwrap();

        let timings = session.timings();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].label, "stage parse");
    }

    #[test]
    fn test_timing_plugin_ignores_unmatched_after() {
        let session = Arc::new(Session::new());
        let ctx = StageContext::new(session.clone(), Arc::new(PhaseDescriptor::new("parse", 1)));

        TimingPlugin::new().on_after_stage(&ctx, &[]).unwrap();
        assert!(session.timings().is_empty());
    }
}

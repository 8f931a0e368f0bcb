//! Check operation - runs the configured pipeline.

use std::{path::Path, sync::Arc};

use eyre::Result;
use strata_config::Config;
use strata_pipeline::{CompilationUnit, Pipeline, Session, Severity, SnapshotPlugin, TimingPlugin};

use super::reported_failure;
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs every configured stage and collects the diagnostics they reported.
pub fn check(
    config: &Config,
    mut units: Vec<CompilationUnit>,
    snapshot_dir: Option<&Path>,
) -> Result<CheckReport> {
    let session = Arc::new(Session::new());
    let mut pipeline = Pipeline::assemble(&session, &config.pipeline.stages, &config.settings())
        .plugin(TimingPlugin::new());
    if let Some(dir) = snapshot_dir {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(dir));
    }

    let failure = reported_failure(pipeline.run(&mut units))?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in session.diagnostics() {
        let msg = if let Some(loc) = &diag.location {
            format!("{}\n  --> {}", diag.message, loc)
        } else {
            diag.message.clone()
        };

        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        unit_count: units.len(),
        stages: config.pipeline.stages.iter().map(|s| s.to_string()).collect(),
        errors,
        warnings,
        infos,
        failure,
    })
}

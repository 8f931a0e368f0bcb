//! Parse operation - runs the parsing stage alone.

use std::sync::Arc;

use eyre::Result;
use strata_config::Config;
use strata_pipeline::{CompilationUnit, Pipeline, Session, StageKind, TimingPlugin};

use super::reported_failure;
use crate::reports::{ParseReport, UnitTree};

/// Execute the parse operation.
///
/// Parses every unit with the configured parse options, whatever stages the
/// pipeline lists.
pub fn parse(config: &Config, mut units: Vec<CompilationUnit>) -> Result<ParseReport> {
    let session = Arc::new(Session::new());
    let pipeline = Pipeline::assemble(&session, &[StageKind::Parse], &config.settings())
        .plugin(TimingPlugin::new());

    let failure = reported_failure(pipeline.run(&mut units))?;

    Ok(ParseReport {
        units: units
            .iter()
            .map(|unit| UnitTree {
                name: unit.source().name().to_string(),
                tree: unit.tree().map(|t| t.to_string()),
            })
            .collect(),
        timings: session.timings(),
        summary: session.summary().into_iter().collect(),
        diagnostics: session.diagnostics(),
        failure,
        show_trees: false,
        show_timings: false,
    })
}

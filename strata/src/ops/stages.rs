//! Stages operation - describes the configured pipeline.

use std::{path::Path, sync::Arc};

use strata_config::Config;
use strata_pipeline::{CheckStage, Pipeline, PhaseDescriptor, Session, StageKind};

use crate::reports::{LintInfo, StageInfo, StagesReport};

/// Execute the stages operation.
pub fn stages(config: &Config, config_path: &Path) -> StagesReport {
    let session = Arc::new(Session::new());
    let settings = config.settings();
    let pipeline = Pipeline::assemble(&session, &config.pipeline.stages, &settings);

    let stages = pipeline
        .stage_info()
        .into_iter()
        .map(|s| StageInfo {
            id: s.id,
            name: s.name,
            description: s.description.to_string(),
        })
        .collect();

    let lints = if config.pipeline.stages.contains(&StageKind::Check) {
        CheckStage::new(
            session,
            Arc::new(PhaseDescriptor::new(StageKind::Check.name(), 0)),
            &settings.check,
        )
        .lint_info()
        .into_iter()
        .map(|l| LintInfo {
            name: l.name.to_string(),
            description: l.description.to_string(),
        })
        .collect()
    } else {
        Vec::new()
    };

    StagesReport {
        config_path: config_path.to_path_buf(),
        stages,
        parse: settings.parse,
        lints,
    }
}

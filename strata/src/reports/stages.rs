//! Stages command report data structures.

use std::path::PathBuf;

use strata_pipeline::{ExecutionMode, FailurePolicy, ParseOptions};

use super::output::{Output, Report};

/// Report data describing the configured pipeline.
#[derive(Debug)]
pub struct StagesReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Stages in run order.
    pub stages: Vec<StageInfo>,
    /// Options the parse stage runs with.
    pub parse: ParseOptions,
    /// Lints the check stage runs, if it is configured.
    pub lints: Vec<LintInfo>,
}

/// Information about a pipeline stage.
#[derive(Debug)]
pub struct StageInfo {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// Information about a check lint.
#[derive(Debug)]
pub struct LintInfo {
    pub name: String,
    pub description: String,
}

impl Report for StagesReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("Strata Pipeline");
        out.newline();

        out.key_value("Config", &self.config_path.display().to_string());
        out.newline();

        out.section("Stages");
        for stage in &self.stages {
            out.numbered_item(
                stage.id as usize,
                &format!("{} - {}", stage.name, stage.description),
            );
        }
        out.newline();

        out.section("Parse Options");
        let mode = match self.parse.mode {
            ExecutionMode::Sequential => "sequential".to_string(),
            ExecutionMode::Parallel if self.parse.workers == 0 => "parallel".to_string(),
            ExecutionMode::Parallel => format!("parallel ({} workers)", self.parse.workers),
        };
        out.key_value_indented("Mode", &mode);
        let on_error = match self.parse.on_error {
            FailurePolicy::FailFast => "fail-fast",
            FailurePolicy::Collect => "collect",
        };
        out.key_value_indented("On error", on_error);
        out.key_value_indented("Recover", if self.parse.recover { "yes" } else { "no" });
        if let Some(timeout) = self.parse.timeout_ms {
            out.key_value_indented("Timeout", &format!("{}ms", timeout));
        }

        if !self.lints.is_empty() {
            out.newline();
            out.section("Check Lints");
            for lint in &self.lints {
                out.list_item(&format!("{}: {}", lint.name, lint.description));
            }
        }
    }
}

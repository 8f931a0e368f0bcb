//! The parsed `strata.toml`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_pipeline::{CheckOptions, ParseOptions, StageKind, StageSettings};
use toml::Spanned;

use crate::{Error, Result, error::SourceContext};

/// Root of `strata.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub parse: ParseOptions,
    pub check: CheckOptions,
}

/// The `[pipeline]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// Stages to run, in order. Never empty and free of duplicates.
    pub stages: Vec<StageKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: StageKind::ALL.to_vec(),
        }
    }
}

// Mirrors `Config` with source spans kept for validation errors.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    pipeline: Option<RawPipeline>,
    #[serde(default)]
    parse: ParseOptions,
    #[serde(default)]
    check: CheckOptions,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipeline {
    stages: Option<Spanned<Vec<Spanned<StageKind>>>>,
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, Self::FILE_NAME)
    }
}

impl Config {
    /// The file looked up when no path is given.
    pub const FILE_NAME: &'static str = "strata.toml";

    /// Parse a strata.toml from a string with a custom filename for error
    /// reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let raw: RawConfig = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;

        let pipeline = match raw.pipeline.and_then(|p| p.stages) {
            Some(stages) => PipelineConfig {
                stages: validate_stages(&ctx, stages)?,
            },
            None => PipelineConfig::default(),
        };

        Ok(Self {
            pipeline,
            parse: raw.parse,
            check: raw.check,
        })
    }

    /// Per-stage options for assembling the pipeline.
    pub fn settings(&self) -> StageSettings {
        StageSettings {
            parse: self.parse.clone(),
            check: self.check.clone(),
        }
    }
}

fn validate_stages(
    ctx: &SourceContext,
    stages: Spanned<Vec<Spanned<StageKind>>>,
) -> Result<Vec<StageKind>> {
    let list_span = stages.span();
    let stages = stages.into_inner();

    if stages.is_empty() {
        return Err(ctx.validation_error(
            "the pipeline must have at least one stage",
            Some(list_span.into()),
        ));
    }

    let mut kinds: Vec<StageKind> = Vec::with_capacity(stages.len());
    for stage in stages {
        let span = stage.span();
        let kind = stage.into_inner();
        if kinds.contains(&kind) {
            return Err(ctx.validation_error(
                format!("stage '{}' is listed more than once", kind),
                Some(span.into()),
            ));
        }
        kinds.push(kind);
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use strata_pipeline::{ExecutionMode, FailurePolicy};

    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pipeline.stages, vec![StageKind::Parse, StageKind::Check]);
        assert_eq!(config.check.max_depth, 32);
    }

    #[test]
    fn test_full_config() {
        let config: Config = r#"
            [pipeline]
            stages = ["parse"]

            [parse]
            mode = "parallel"
            workers = 4
            on_error = "collect"
            recover = true
            timeout_ms = 1500

            [check]
            max_depth = 8
        "#
        .parse()
        .unwrap();

        assert_eq!(config.pipeline.stages, vec![StageKind::Parse]);
        assert_eq!(config.parse.mode, ExecutionMode::Parallel);
        assert_eq!(config.parse.workers, 4);
        assert_eq!(config.parse.on_error, FailurePolicy::Collect);
        assert!(config.parse.recover);
        assert_eq!(config.parse.timeout_ms, Some(1500));
        assert_eq!(config.check.max_depth, 8);

        let settings = config.settings();
        assert_eq!(settings.parse, config.parse);
        assert_eq!(
            settings.parse.timeout_ms.map(Duration::from_millis),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_pipeline_without_stages_uses_default() {
        let config: Config = "[pipeline]\n".parse().unwrap();
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_unknown_stage() {
        let err = "[pipeline]\nstages = [\"parse\", \"lower\"]\n"
            .parse::<Config>()
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_empty_stages() {
        let err = "[pipeline]\nstages = []\n".parse::<Config>().unwrap_err();
        match *err {
            Error::Validation { message, span, .. } => {
                assert_eq!(message, "the pipeline must have at least one stage");
                assert_eq!(span.map(|s| s.offset()), Some(20));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_stage() {
        let src = "[pipeline]\nstages = [\"parse\", \"check\", \"parse\"]\n";
        let err = src.parse::<Config>().unwrap_err();
        match *err {
            Error::Validation { message, span, .. } => {
                assert_eq!(message, "stage 'parse' is listed more than once");
                let offset = span.map(|s| s.offset()).unwrap();
                assert_eq!(&src[offset..offset + 7], "\"parse\"");
                assert!(offset > 30);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "[parse]\nthreads = 4\n".parse::<Config>().unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}

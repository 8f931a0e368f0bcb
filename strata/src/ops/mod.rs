//! Core operations.
//!
//! This module contains the business logic for strata commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod parse;
pub mod stages;

use std::path::PathBuf;

pub use check::check;
use eyre::{Context, Result};
pub use parse::parse;
pub use stages::stages;
use strata_core::SourceFile;
use strata_pipeline::{CompilationUnit, StageError};

/// Read every file into an unparsed unit, in the order given.
pub fn load_units(files: &[PathBuf]) -> Result<Vec<CompilationUnit>> {
    files
        .iter()
        .map(|path| {
            SourceFile::open(path)
                .map(CompilationUnit::from)
                .wrap_err("Failed to load source file")
        })
        .collect()
}

/// Split a pipeline result into a reportable failure and everything else.
///
/// Stage failures whose details were already reported to the session as
/// diagnostics come back as `Ok(Some(message))`.
pub(crate) fn reported_failure(result: Result<()>) -> Result<Option<String>> {
    match result {
        Ok(()) => Ok(None),
        Err(err) => match err.downcast_ref::<StageError>() {
            Some(StageError::Diagnostics { .. } | StageError::Failures { .. }) => {
                Ok(Some(err.to_string()))
            }
            _ => Err(err),
        },
    }
}

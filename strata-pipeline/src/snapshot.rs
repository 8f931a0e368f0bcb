//! Pipeline snapshot plugin for inspecting units between stages.
//!
//! The plugin captures every unit's body and the session's diagnostics after
//! each stage, so the effect of a stage can be examined on its own.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::Result;
use parking_lot::RwLock;
use serde::Serialize;

use crate::{Body, CompilationUnit, Diagnostic, Plugin, stage::StageContext};

/// One unit as it looked after a stage.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    pub source: String,
    pub body: Body,
}

/// The batch as it looked after a stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageSnapshot {
    /// The stage that just completed.
    pub stage: String,
    /// The stage's phase id.
    pub id: u32,
    pub units: Vec<UnitSnapshot>,
    /// Diagnostics reported so far.
    pub diagnostics: Vec<Diagnostic>,
}

impl StageSnapshot {
    fn file_name(&self) -> String {
        format!("{:02}-{}.json", self.id, self.stage)
    }
}

/// A plugin that captures the batch after each stage.
///
/// Snapshots are kept in memory unless an output directory is set, in which
/// case each one is written out as it is taken and then dropped.
///
/// # Example
///
/// ```ignore
/// let snapshots = Arc::new(SnapshotPlugin::new());
/// let pipeline = Pipeline::assemble(&session, &kinds, &settings).plugin(snapshots.clone());
/// pipeline.run(&mut units)?;
///
/// snapshots.write_to_dir(".strata/debug")?;
/// ```
#[derive(Debug, Default)]
pub struct SnapshotPlugin {
    /// Collected snapshots. Stays empty when `output_dir` is set.
    snapshots: RwLock<Vec<StageSnapshot>>,
    /// Output directory written to after every stage.
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot plugin that writes each snapshot as it is taken.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// Get all snapshots held in memory.
    pub fn snapshots(&self) -> Vec<StageSnapshot> {
        self.snapshots.read().clone()
    }

    /// Write all snapshots to `dir`, one `<id>-<stage>.json` file each.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for snapshot in self.snapshots.read().iter() {
            write_snapshot(dir, snapshot)?;
        }

        Ok(())
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_stage(&self, ctx: &StageContext, units: &[CompilationUnit]) -> Result<()> {
        let snapshot = StageSnapshot {
            stage: ctx.descriptor().name().to_string(),
            id: ctx.descriptor().id(),
            units: units
                .iter()
                .map(|unit| UnitSnapshot {
                    source: unit.source().name().to_string(),
                    body: unit.body().clone(),
                })
                .collect(),
            diagnostics: ctx.session().diagnostics(),
        };

        match self.output_dir {
            Some(ref dir) => {
                fs::create_dir_all(dir)?;
                write_snapshot(dir, &snapshot)?;
            }
            None => self.snapshots.write().push(snapshot),
        }
        Ok(())
    }
}

fn write_snapshot(dir: &Path, snapshot: &StageSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(dir.join(snapshot.file_name()), json)?;
    Ok(())
}

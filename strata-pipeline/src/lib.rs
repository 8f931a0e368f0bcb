//! Compilation pipeline for Strata.
//!
//! This crate provides the [`Stage`] abstraction that every compiler phase
//! implements, the run-wide [`Session`] that stages report timings and
//! diagnostics to, and the built-in stages:
//!
//! - [`ParserStage`] - turns every unit's source into its syntax tree
//! - [`CheckStage`] - runs lints over parsed trees
//!
//! A [`Pipeline`] runs an ordered list of stages over a batch of
//! [`CompilationUnit`]s, calling [`Plugin`] hooks around each stage.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use strata_core::SourceFile;
//! use strata_pipeline::{
//!     CompilationUnit, ParseOptions, ParserStage, PhaseDescriptor, Session, Stage,
//!     SyntaxFactory,
//! };
//!
//! let session = Arc::new(Session::new());
//! let descriptor = Arc::new(PhaseDescriptor::new("parse", 1));
//! let stage = ParserStage::new(
//!     session.clone(),
//!     descriptor,
//!     SyntaxFactory::default(),
//!     ParseOptions::default(),
//! );
//!
//! let mut units = vec![CompilationUnit::new(SourceFile::new("a.st", "1 + 1"))];
//! stage.apply(&mut units).unwrap();
//!
//! assert!(units[0].is_parsed());
//! assert_eq!(session.timings()[0].label, "parsed a.st");
//! ```

mod collaborator;
mod descriptor;
mod diagnostic;
mod error;
mod plugin;
mod runner;
mod session;
mod snapshot;
mod stage;
pub mod stages;
mod unit;

pub use collaborator::{Parse, ParserFactory, SyntaxFactory};
pub use descriptor::PhaseDescriptor;
pub use diagnostic::{Diagnostic, Severity};
pub use error::{PipelineError, SessionError, StageError};
pub use plugin::{Plugin, TimingPlugin};
pub use runner::Pipeline;
pub use session::{Session, Timing, TimingScope};
pub use snapshot::{SnapshotPlugin, StageSnapshot, UnitSnapshot};
pub use stage::{Stage, StageContext, StageInfo, StageKind, StageSettings};
pub use stages::{
    CheckOptions, CheckStage, ExecutionMode, FailurePolicy, ParseOptions, ParserStage,
};
pub use unit::{Body, CompilationUnit};

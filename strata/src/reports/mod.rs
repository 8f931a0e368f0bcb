//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod output;
mod parse;
mod stages;

pub use check::CheckReport;
pub use output::{Report, TerminalOutput};
pub use parse::{ParseReport, UnitTree};
pub use stages::{LintInfo, StageInfo, StagesReport};

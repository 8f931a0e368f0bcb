//! Built-in pipeline stages.
//!
//! - [`ParserStage`] - parses every unit's source into its syntax tree
//! - [`CheckStage`] - runs lints over parsed trees

mod check;
mod parse;

pub use check::{
    CheckOptions, CheckStage, DivisionByZeroLint, Lint, LintInfo, NestingDepthLint,
    UndefinedNameLint,
};
pub use parse::{ExecutionMode, FailurePolicy, ParseOptions, ParserStage};

//! Configuration for the Strata compiler, read from `strata.toml`.
//!
//! ```toml
//! [pipeline]
//! stages = ["parse", "check"]
//!
//! [parse]
//! mode = "parallel"
//! workers = 4
//! on_error = "collect"
//!
//! [check]
//! max_depth = 16
//! ```
//!
//! Every section and key is optional.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use file::ConfigFile;

use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;

use super::{ExitOnSyntaxError, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Source files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write a JSON snapshot of the units after each stage to this directory
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path);
        let units = ops::load_units(&self.files)?;

        let report =
            ops::check(&config, units, self.snapshot_dir.as_deref()).exit_on_syntax_error()?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}

use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;

use super::{ExitOnSyntaxError, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ParseCommand {
    /// Source files to parse
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print each unit's syntax tree
    #[arg(long)]
    pub tree: bool,

    /// Print how long each unit took to parse
    #[arg(long)]
    pub timings: bool,
}

impl ParseCommand {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path);
        let units = ops::load_units(&self.files)?;

        let mut report = ops::parse(&config, units).exit_on_syntax_error()?;
        report.show_trees = self.tree;
        report.show_timings = self.timings;
        report.render(&mut TerminalOutput::new());

        if report.failure.is_some() {
            std::process::exit(1);
        }
        Ok(())
    }
}

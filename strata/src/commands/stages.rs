use std::path::Path;

use clap::Args;
use eyre::Result;

use super::load_config;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct StagesCommand {}

impl StagesCommand {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path);
        let report = ops::stages(&config, config_path);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}

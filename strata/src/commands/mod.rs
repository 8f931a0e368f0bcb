mod check;
mod completions;
mod parse;
mod stages;

use std::path::{Path, PathBuf};

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use parse::ParseCommand;
use stages::StagesCommand;
use strata_config::{Config, ConfigFile};
use strata_pipeline::StageError;

/// Extension trait for exiting on config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for strata_config::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Extension trait for exiting on syntax errors, rendered with their source
pub(crate) trait ExitOnSyntaxError<T> {
    fn exit_on_syntax_error(self) -> Result<T>;
}

impl<T> ExitOnSyntaxError<T> for Result<T> {
    fn exit_on_syntax_error(self) -> Result<T> {
        self.map_err(|err| match err.downcast::<StageError>() {
            Ok(StageError::Parse { unit, source }) => {
                let report = miette::Report::new(source).wrap_err(format!("failed to parse '{}'", unit));
                eprintln!("{:?}", report);
                std::process::exit(1);
            }
            Ok(other) => other.into(),
            Err(err) => err,
        })
    }
}

#[derive(Parser)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Run the Strata compiler pipeline over source files")]
pub(crate) struct Cli {
    /// Path to strata.toml (defaults are used when it does not exist)
    #[arg(short, long, global = true, default_value = Config::FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Parse(cmd) => cmd.run(&self.config),
            Commands::Check(cmd) => cmd.run(&self.config),
            Commands::Stages(cmd) => cmd.run(&self.config),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse source files and print their syntax trees
    Parse(ParseCommand),

    /// Run the configured pipeline and report diagnostics
    Check(CheckCommand),

    /// List the configured pipeline stages
    Stages(StagesCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

pub(crate) fn load_config(path: &Path) -> Config {
    let file = ConfigFile::open_or_default(path).unwrap_or_exit();
    tracing::debug!(path = %file.path().display(), "loaded config");
    file.into_config()
}

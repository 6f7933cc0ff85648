use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `retrograde` binary.
#[derive(Debug, Parser)]
#[command(name = "retrograde", version, about = "Retrograde - Gemini orbit manager")]
pub struct Cli {
    /// Orbit identifier (directory name under the state dir)
    pub orbit_id: String,

    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Root directory of orbit state (overrides general.state_dir)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            state_dir: self.state_dir.clone(),
        }
    }
}

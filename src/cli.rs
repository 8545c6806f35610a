use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, SplitPlacement};

#[derive(Debug, Parser)]
#[command(
    name = "coursepick",
    version,
    about = "Pick course sections on a registration page by course code"
)]
pub struct CliArgs {
    /// Config file (defaults to the platform config dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pause between codes in milliseconds
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// CSS selector for section containers
    #[arg(long, global = true)]
    pub container: Option<String>,

    /// CSS selector for the checkbox inside a container
    #[arg(long, global = true)]
    pub checkbox: Option<String>,

    /// Append split codes at the end of the list instead of after their field
    #[arg(long, global = true)]
    pub append_end: bool,

    /// Log per-section outcomes
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Tick the checkboxes of matching sections in a saved registration page
    Select {
        /// HTML file of the registration page
        #[arg(long)]
        page: PathBuf,
        /// Course codes; comma-separated lists are split
        #[arg(short, long = "codes", required = true)]
        codes: Vec<String>,
        /// Print the resulting sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the page-context JavaScript for the given codes
    Script {
        #[arg(short, long = "codes", required = true)]
        codes: Vec<String>,
    },
    /// Print the normalized codes, one per line
    Split { text: Vec<String> },
}

impl CliArgs {
    /// Command-line flags win over file values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(delay_ms) = self.delay_ms {
            config.selector.delay_ms = delay_ms;
        }
        if let Some(container) = &self.container {
            config.selector.container = container.clone();
        }
        if let Some(checkbox) = &self.checkbox {
            config.selector.checkbox = checkbox.clone();
        }
        if self.append_end {
            config.collector.placement = SplitPlacement::AppendEnd;
        }
    }
}

pub fn parse_cli_args(raw_args: Vec<String>) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(raw_args)
}

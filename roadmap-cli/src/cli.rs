use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Validate and summarize structured roadmaps")]
pub struct Cli {
    /// Path to the roadmap file (defaults to the configured file, then ROADMAP.json)
    #[clap(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Enable debug logging
    #[clap(long, short = 'v')]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Dimension to group items by
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    Area,
    Type,
    Phase,
    Status,
    Quarter,
    Priority,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the roadmap and list every problem found
    Validate,

    /// Show item counts and completion percentage
    Stats,

    /// List items grouped by a single dimension
    Group {
        /// Dimension to group by
        #[clap(long, value_enum, default_value = "status")]
        by: GroupBy,
    },

    /// Show the status legend (defaults merged with the document's overrides)
    Legend,

    /// Rewrite the roadmap in canonical form
    Fmt {
        /// Write to this path instead of overwriting the input
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Partgroup - Group parts into cohesive families by shared feature tokens.
#[derive(Debug, Parser)]
#[command(name = "partgroup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PARTGROUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full grouping heuristic on a dataset
    Group(GroupArgs),

    /// Print the pairwise similarity matrix
    Matrix(MatrixArgs),

    /// Select the indicator group (seeds) without assigning the rest
    Seeds(SeedsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Dataset input options shared by every analysis command.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Dataset file (delimited rows or JSON); use '-' for stdin
    pub file: String,

    /// Input format (detected from the file extension by default)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormatArg>,

    /// Cell delimiter for row files
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Treat the first row as a header and skip it
    #[arg(long)]
    pub skip_header: bool,

    /// Keep the first row even if the config skips headers
    #[arg(long, conflicts_with = "skip_header")]
    pub no_skip_header: bool,
}

impl InputArgs {
    /// Header handling from the flags, falling back to `default`.
    pub fn skip_header_or(&self, default: bool) -> bool {
        if self.skip_header {
            true
        } else if self.no_skip_header {
            false
        } else {
            default
        }
    }
}

/// Input format argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum InputFormatArg {
    /// One part per line, cells separated by the delimiter
    Rows,
    /// JSON object of id -> tokens, or array of token rows
    Json,
}

/// Arguments for the group command.
#[derive(Debug, Parser)]
pub struct GroupArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of groups to seed
    #[arg(short = 'n', long)]
    pub seeds: Option<usize>,

    /// Also print the similarity matrix
    #[arg(long)]
    pub show_matrix: bool,

    /// Also print seed selection and assignment steps
    #[arg(long)]
    pub show_steps: bool,

    /// Print the within-group similarity matrix of every group
    #[arg(long)]
    pub group_matrices: bool,
}

/// Arguments for the matrix command.
#[derive(Debug, Parser)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the seeds command.
#[derive(Debug, Parser)]
pub struct SeedsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of seeds to select
    #[arg(short = 'n', long)]
    pub seeds: Option<usize>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<InputFormatArg> for crate::loader::InputFormat {
    fn from(format: InputFormatArg) -> Self {
        match format {
            InputFormatArg::Rows => crate::loader::InputFormat::Delimited,
            InputFormatArg::Json => crate::loader::InputFormat::Json,
        }
    }
}

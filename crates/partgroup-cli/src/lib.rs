//! Partgroup CLI library.
//!
//! This library provides the command-line surface for the grouping heuristic:
//! dataset loading, configuration management, command execution, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use loader::{FileSource, InputFormat};
pub use output::Formatter;

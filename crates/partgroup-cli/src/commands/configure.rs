//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let target = Config::resolve_path(path)?;
            if target.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                )));
            }
            let written = Config::default().save(Some(&target))?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default config to {}", written.display()))
            );
        }
        ConfigAction::Path => {
            println!("{}", Config::resolve_path(path)?.display());
        }
    }

    Ok(())
}

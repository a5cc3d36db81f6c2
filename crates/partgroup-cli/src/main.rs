//! Partgroup CLI - Group parts into cohesive families by shared feature tokens.

use clap::Parser;
use partgroup_cli::commands;
use partgroup_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> partgroup_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();

    // A broken config file must still be inspectable and replaceable
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Command::Config(_)) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter =
        Formatter::new(format, color_enabled).with_precision(config.settings.precision);

    match cli.command {
        Command::Group(args) => commands::execute_group(args, &config, &formatter)?,
        Command::Matrix(args) => commands::execute_matrix(args, &config, &formatter)?,
        Command::Seeds(args) => commands::execute_seeds(args, &config, &formatter)?,
        Command::Config(args) => {
            commands::execute_config(args, &config, config_path, &formatter)?
        }
    }

    Ok(())
}

/// Initialize tracing on stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

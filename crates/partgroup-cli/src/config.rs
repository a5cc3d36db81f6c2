//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use partgroup_domain::{GroupingConfig, DEFAULT_SEED_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest number of decimals accepted for printed scores.
const MAX_PRECISION: usize = 10;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Grouping and input settings
    #[serde(default)]
    pub grouping: GroupingSettings,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Grouping and dataset input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingSettings {
    /// Number of groups to seed when `--seeds` is not given
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Cell delimiter for row files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Skip the first row of row files
    #[serde(default)]
    pub skip_header: bool,
}

/// Global output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Decimals shown for similarity and cohesion scores
    #[serde(default = "default_precision")]
    pub precision: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".partgroup").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from file, or defaults if the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(path)?;

        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(&path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file, returning the path written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = Self::resolve_path(path)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.grouping.seed_count < 2 {
            return Err(CliError::Config(format!(
                "seed_count must be at least 2, got {}",
                self.grouping.seed_count
            )));
        }
        if self.settings.precision > MAX_PRECISION {
            return Err(CliError::Config(format!(
                "precision must be at most {}, got {}",
                MAX_PRECISION, self.settings.precision
            )));
        }
        Ok(())
    }

    /// Grouping configuration, with an optional seed count override.
    pub fn grouping_config(&self, seeds: Option<usize>) -> GroupingConfig {
        GroupingConfig::with_seed_count(seeds.unwrap_or(self.grouping.seed_count))
    }
}

impl Default for GroupingSettings {
    fn default() -> Self {
        Self {
            seed_count: DEFAULT_SEED_COUNT,
            delimiter: default_delimiter(),
            skip_header: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            precision: default_precision(),
        }
    }
}

fn default_seed_count() -> usize {
    DEFAULT_SEED_COUNT
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_precision() -> usize {
    3
}

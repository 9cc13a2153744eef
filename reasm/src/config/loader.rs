//! Configuration loading and parsing.
//!
//! Precedence, lowest first:
//! 1. Default values
//! 2. Configuration file (TOML)
//! 3. Environment variables (`REASM_` prefix, `__` separator)
//! 4. Command-line arguments

use anyhow::{Context, Result};
use clap::Parser;
use config::Config as ConfigLoader;
use std::path::{Path, PathBuf};

use super::ReplayConfig;

/// Command-line interface for the replay driver.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Segment script to replay (TOML)
    pub script: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    #[arg(long, short = 'c', default_value = "reasm.toml")]
    pub config: String,

    /// Stream capacity in bytes (overrides config file)
    #[arg(long)]
    pub capacity: Option<u64>,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    pub validate: bool,

    /// Print default configuration and exit
    #[arg(long)]
    pub print_default_config: bool,
}

/// Load, merge and validate the replay configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be read or parsed
/// - Environment overrides cannot be collected
/// - Validation fails
pub fn load_config(cli: &CliArgs) -> Result<ReplayConfig> {
    let mut config = load_config_file(&cli.config)?;

    apply_env_overrides(&mut config)?;
    apply_cli_overrides(&mut config, cli);

    config.validate().map_err(|errors| {
        anyhow::anyhow!("Configuration validation failed:\n{}", errors.join("\n"))
    })?;

    Ok(config)
}

/// Load configuration from a TOML file, falling back to defaults if absent.
pub(crate) fn load_config_file(path: &str) -> Result<ReplayConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        tracing::warn!(
            config_path = %path,
            "Configuration file not found, using defaults"
        );
        return Ok(ReplayConfig::default());
    }

    let config_str = std::fs::read_to_string(path_obj)
        .with_context(|| format!("Failed to read config file: {}", path))?;

    toml::from_str(&config_str).with_context(|| format!("Failed to parse TOML config: {}", path))
}

/// Apply environment variable overrides.
///
/// Examples:
/// - `REASM_STREAM__CAPACITY=4096`
/// - `REASM_LOGGING__LEVEL=debug`
fn apply_env_overrides(config: &mut ReplayConfig) -> Result<()> {
    let env_config = ConfigLoader::builder()
        .add_source(config::Environment::with_prefix("REASM").separator("__"))
        .build()
        .context("Failed to load environment variables")?;

    if let Ok(capacity) = env_config.get_int("stream.capacity") {
        match u64::try_from(capacity) {
            Ok(capacity) => config.stream.capacity = capacity,
            Err(_) => tracing::warn!(capacity, "Negative stream capacity in environment, ignoring"),
        }
    }
    if let Ok(level) = env_config.get_string("logging.level") {
        if let Ok(parsed_level) = level.parse() {
            config.logging.level = parsed_level;
        }
    }
    if let Ok(json) = env_config.get_bool("logging.json_format") {
        config.logging.json_format = json;
    }

    Ok(())
}

/// Apply command-line argument overrides.
pub(crate) fn apply_cli_overrides(config: &mut ReplayConfig, cli: &CliArgs) {
    if let Some(capacity) = cli.capacity {
        config.stream.capacity = capacity;
    }

    if let Some(ref level_str) = cli.log_level {
        if let Ok(level) = level_str.parse() {
            config.logging.level = level;
        } else {
            tracing::warn!(level = %level_str, "Invalid log level specified, ignoring");
        }
    }
}

/// Print the default configuration in TOML format.
pub fn print_default_config() -> Result<()> {
    let default_config = ReplayConfig::default();
    let toml_str =
        toml::to_string_pretty(&default_config).context("Failed to serialize default config")?;
    println!("{}", toml_str);
    Ok(())
}

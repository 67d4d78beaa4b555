//! Shared command line plumbing for the pomtools binaries: the common
//! logging/configuration flags, their validation, and the bootstrap that
//! turns them into an installed logger plus a loaded ConfigManager.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::LevelFilter;

use crate::config::ConfigManager;
use crate::logging::{self, LogConfig, LogDestination, LogFormat};

/// Flags shared by both binaries, flattened into their arg structs
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

impl CommonArgs {
    /// Validate flag combinations
    pub fn validate(&self) -> Result<()> {
        let level_flags = [self.verbose, self.quiet, self.debug]
            .iter()
            .filter(|&&flag| flag)
            .count();
        if level_flags > 1 {
            return Err(anyhow::anyhow!(
                "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
            ));
        }

        if let Some(format) = &self.log_format {
            format.parse::<LogFormat>().map_err(anyhow::Error::msg)?;
        }
        if let Some(level) = &self.log_file_level {
            logging::parse_log_level(level)?;
        }
        if self.log_file_level.is_some() && self.log_file.is_none() {
            return Err(anyhow::anyhow!(
                "--log-file-level requires --log-file to be specified"
            ));
        }
        Ok(())
    }
}

/// Validate the common flags, load configuration and install the logger.
/// Returns the ConfigManager so tools can read their own sections.
pub fn setup(args: &CommonArgs) -> Result<ConfigManager> {
    args.validate()?;
    let config = match &args.config_file {
        Some(path) => ConfigManager::load_from_file(path.clone())?,
        None => ConfigManager::load()?,
    };
    let log_config = build_log_config(args, &config)?;
    logging::init_logger(log_config)?;
    Ok(config)
}

/// Merge CLI flags over `[logging]` config values into a LogConfig.
/// Flags always win.
fn build_log_config(args: &CommonArgs, config: &ConfigManager) -> Result<LogConfig> {
    let mut console_level = config
        .get_log_level("logging", "level")?
        .unwrap_or(LevelFilter::Info);
    if args.verbose {
        console_level = LevelFilter::Debug;
    }
    if args.debug {
        console_level = LevelFilter::Trace;
    }
    if args.quiet {
        console_level = LevelFilter::Error;
    }

    let format = match &args.log_format {
        Some(value) => value.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
        None => match config.get_value("logging", "format") {
            Some(value) => value.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
            None => LogFormat::Text,
        },
    };

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.get_path("logging", "file"));
    let file_level = match &args.log_file_level {
        Some(level) => Some(logging::parse_log_level(level)?),
        None => config.get_log_level("logging", "file-level")?,
    };

    let (destination, file_level) = match log_file {
        Some(path) => (
            LogDestination::Both(path),
            Some(file_level.unwrap_or(console_level)),
        ),
        None => (LogDestination::Console, None),
    };

    Ok(LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

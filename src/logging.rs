// Logging backend for the pomtools binaries.
// Text or JSON lines on stderr, with an optional log file carrying its own
// independent level. Timestamps are local time, YYYY-MM-DD HH:mm:ss.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use log::{Level, LevelFilter};
use serde::Serialize;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

/// Logging configuration assembled from CLI flags and the config file
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    /// Level for file output; `None` disables file logging even when the
    /// destination carries a path
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonLogEntry<'a> {
    timestamp: String,
    level: String,
    message: &'a str,
}

struct ToolLogger {
    config: LogConfig,
}

impl ToolLogger {
    fn format_line(&self, level: Level, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let level = level.to_string().to_uppercase();
        match self.config.format {
            LogFormat::Text => format!("{} [{}] {}", timestamp, level, message),
            LogFormat::Json => {
                let entry = JsonLogEntry {
                    timestamp: timestamp.clone(),
                    level: level.clone(),
                    message,
                };
                serde_json::to_string(&entry)
                    .unwrap_or_else(|_| format!("{} [{}] {}", timestamp, level, message))
            }
        }
    }

    fn console_enabled(&self, level: Level) -> bool {
        matches!(
            self.config.destination,
            LogDestination::Console | LogDestination::Both(_)
        ) && level <= self.config.console_level
    }

    fn file_target(&self, level: Level) -> Option<&PathBuf> {
        let path = match &self.config.destination {
            LogDestination::File(path) | LogDestination::Both(path) => path,
            LogDestination::Console => return None,
        };
        match self.config.file_level {
            Some(file_level) if level <= file_level => Some(path),
            _ => None,
        }
    }
}

fn append_line(path: &PathBuf, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    writeln!(file, "{}", line).context("Failed to write to log file")
}

impl log::Log for ToolLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console_enabled(metadata.level()) || self.file_target(metadata.level()).is_some()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_line(record.level(), &record.args().to_string());
        if self.console_enabled(record.level()) {
            let _ = writeln!(io::stderr(), "{}", line);
        }
        if let Some(path) = self.file_target(record.level()) {
            if let Err(e) = append_line(path, &line) {
                eprintln!("Log file error: {}", e);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Install the global logger. May only be called once per process.
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = match config.file_level {
        Some(file_level) if file_level > config.console_level => file_level,
        _ => config.console_level,
    };
    log::set_boxed_logger(Box::new(ToolLogger { config }))
        .context("Failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Convert a level name to a LevelFilter
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    match level.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!(
            "Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off",
            level
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("warn").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("TRACE").unwrap(), LevelFilter::Trace);
        assert_eq!(parse_log_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_text_line_format() {
        let logger = ToolLogger {
            config: LogConfig::default(),
        };
        let line = logger.format_line(Level::Warn, "pom rewritten");
        assert!(line.contains("[WARN]"));
        assert!(line.ends_with("pom rewritten"));
        // Timestamp prefix: YYYY-MM-DD HH:MM:SS
        assert_eq!(line.chars().nth(4), Some('-'));
        assert_eq!(line.chars().nth(10), Some(' '));
        assert_eq!(line.chars().nth(13), Some(':'));
    }

    #[test]
    fn test_json_line_format() {
        let logger = ToolLogger {
            config: LogConfig {
                format: LogFormat::Json,
                ..LogConfig::default()
            },
        };
        let line = logger.format_line(Level::Info, "generated 2 entries");
        assert!(line.contains(r#""level":"INFO""#));
        assert!(line.contains(r#""message":"generated 2 entries""#));
        assert!(line.contains(r#""timestamp":""#));
    }

    #[test]
    fn test_file_logging_requires_a_level() {
        let logger = ToolLogger {
            config: LogConfig {
                destination: LogDestination::File(PathBuf::from("/tmp/pomtools.log")),
                file_level: None,
                ..LogConfig::default()
            },
        };
        assert!(logger.file_target(Level::Error).is_none());
        assert!(!logger.console_enabled(Level::Error));
    }

    #[test]
    fn test_init_logger_installs_global_logger() {
        // First install wins; the log facade rejects a second one
        assert!(init_logger(LogConfig::default()).is_ok());
        assert!(init_logger(LogConfig::default()).is_err());
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[test]
    fn test_both_destination_splits_levels() {
        let logger = ToolLogger {
            config: LogConfig {
                destination: LogDestination::Both(PathBuf::from("/tmp/pomtools.log")),
                console_level: LevelFilter::Warn,
                file_level: Some(LevelFilter::Debug),
                ..LogConfig::default()
            },
        };
        assert!(logger.console_enabled(Level::Warn));
        assert!(!logger.console_enabled(Level::Info));
        assert!(logger.file_target(Level::Debug).is_some());
        assert!(logger.file_target(Level::Trace).is_none());
    }
}

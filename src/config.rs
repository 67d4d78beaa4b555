//! TOML configuration with a discovery hierarchy.
//!
//! Values are kept as plain strings in a section -> key -> value map;
//! accessors do type conversion on demand. Discovery order: the
//! `POMTOOLS_CONFIG` environment variable, the XDG config directory,
//! `~/.pomtools.toml`, then a project-local `./.pomtools.toml`. The first
//! existing file wins; no files at all yields an empty configuration.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;
use toml::Value;

use crate::repolist::RepolistPaths;

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
}

impl ConfigManager {
    /// Create a ConfigManager from an in-memory map (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self { config }
    }

    /// Load configuration using the discovery hierarchy
    pub fn load() -> Result<Self> {
        for path in discover_config_files() {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }
        debug!("No configuration file found, using empty configuration");
        Ok(Self {
            config: Configuration::new(),
        })
    }

    /// Load configuration from an explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(Self { config })
    }

    /// Get a value, falling back to the `base` section
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        self.config
            .get(section)
            .and_then(|s| s.get(key))
            .or_else(|| self.config.get("base").and_then(|s| s.get(key)))
    }

    /// Get a path value
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Get a log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Resolve the repo-list input/output paths, `[repolist]` overrides
    /// falling back to the fixed default filenames
    pub fn get_repolist_paths(&self) -> RepolistPaths {
        let defaults = RepolistPaths::default();
        RepolistPaths {
            input: self
                .get_path("repolist", "input")
                .unwrap_or(defaults.input),
            output: self
                .get_path("repolist", "output")
                .unwrap_or(defaults.output),
        }
    }
}

/// Candidate configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(env_path) = env::var("POMTOOLS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pomtools").join("config.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".pomtools.toml"));
    }
    paths.push(PathBuf::from("./.pomtools.toml"));
    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content into the string-based configuration map. Top-level
/// tables become sections; bare top-level keys land in `base`.
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let value: Value = content.parse().context("Failed to parse TOML content")?;
    let mut config = Configuration::new();

    if let Value::Table(table) = value {
        for (key, value) in table {
            match value {
                Value::Table(section) => {
                    let entries = section
                        .into_iter()
                        .map(|(k, v)| (k, toml_value_to_string(&v)))
                        .collect();
                    config.insert(key, entries);
                }
                other => {
                    config
                        .entry("base".to_string())
                        .or_default()
                        .insert(key, toml_value_to_string(&other));
                }
            }
        }
    }
    Ok(config)
}

fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

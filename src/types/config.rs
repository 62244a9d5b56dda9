//! Configuration structures.
//!
//! Configuration is loaded from a JSON file and environment variables.
//! Precedence: explicit path, then `ARCRS_CONFIG`, then built-in defaults.
//! `ARCRS_LOG_LEVEL` and `ARCRS_LOG_FORMAT` override the file afterwards.

use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "ARCRS_CONFIG";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "ARCRS_LOG_LEVEL";
/// Environment variable selecting the log format (`json` or anything else).
pub const LOG_FORMAT_ENV: &str = "ARCRS_LOG_FORMAT";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Toolboxes the registry pulls tools from, in registration order.
    #[serde(default = "default_toolboxes")]
    pub toolboxes: Vec<ToolboxSpec>,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toolboxes: default_toolboxes(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A toolbox to create: display label plus the alias it is registered under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolboxSpec {
    pub label: String,
    pub alias: String,
}

impl ToolboxSpec {
    pub fn new(label: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            alias: alias.into(),
        }
    }
}

fn default_toolboxes() -> Vec<ToolboxSpec> {
    vec![ToolboxSpec::new("Rust Copy Tools", "rust_copy_tools")]
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// Defaults with `ARCRS_LOG_LEVEL` / `ARCRS_LOG_FORMAT` applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply `ARCRS_LOG_LEVEL` / `ARCRS_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            self.json_logs = format.eq_ignore_ascii_case("json");
        }
    }
}

impl Config {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read config {}: {}", path.display(), e),
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Resolve the effective configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var(CONFIG_ENV) {
                Ok(env_path) if !env_path.trim().is_empty() => Self::from_file(env_path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `ARCRS_LOG_LEVEL` / `ARCRS_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) {
        self.observability.apply_env_overrides();
    }

    fn validate(&self) -> Result<()> {
        for (i, spec) in self.toolboxes.iter().enumerate() {
            if spec.label.trim().is_empty() {
                return Err(Error::validation(format!("toolboxes[{}]: label cannot be empty", i)));
            }
            if spec.alias.trim().is_empty() {
                return Err(Error::validation(format!("toolboxes[{}]: alias cannot be empty", i)));
            }
        }
        Ok(())
    }
}

// ABOUTME: Configuration file loading, validation, and hierarchical merging for Linear CLI
// ABOUTME: TOML files in project and XDG locations; the project file has the highest precedence

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{env, files};
use crate::output::Format;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_team: Option<String>,
    #[serde(default, deserialize_with = "validate_format")]
    pub preferred_format: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "validate_duration")]
    pub timeout: Option<String>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        Self::load_from_paths(&Self::get_config_paths())
    }

    /// Load configuration from file paths ordered highest precedence first.
    /// Missing files are skipped; unreadable or invalid ones are errors.
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths.iter().rev() {
            if !path.is_file() {
                continue;
            }
            log::debug!("loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        Ok(config)
    }

    /// Get standard config file paths in order of precedence (highest first)
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Project-specific config
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(files::PROJECT_CONFIG));
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os(env::XDG_CONFIG_HOME) {
            paths.push(
                PathBuf::from(config_home)
                    .join(files::CONFIG_DIR)
                    .join(files::USER_CONFIG),
            );
        }

        // 3. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join(files::CONFIG_DIR)
                    .join(files::USER_CONFIG),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            default_team: other.default_team.or(self.default_team),
            preferred_format: other.preferred_format.or(self.preferred_format),
            api_url: other.api_url.or(self.api_url),
            timeout: other.timeout.or(self.timeout),
        }
    }

    pub fn output_format(&self) -> Option<Format> {
        match self.preferred_format.as_deref() {
            Some("json") => Some(Format::Json),
            Some("table") => Some(Format::Table),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|value| parse_duration(value).map_err(anyhow::Error::msg))
            .transpose()
    }
}

/// Parses `500ms`, `10s`, `2m` or `1h`.
pub fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("Invalid duration '{value}'. Expected a unit like 10s, 2m or 500ms"))?;
    let (number, unit) = value.split_at(split);
    let amount: u64 = number
        .parse()
        .map_err(|_| format!("Invalid duration '{value}'. Expected a number before the unit"))?;

    let too_large = || format!("Invalid duration '{value}'. Value is too large");
    match unit {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => amount
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(too_large),
        "h" => amount
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(too_large),
        _ => Err(format!(
            "Invalid duration '{value}'. Unit must be one of ms, s, m, h"
        )),
    }
}

fn validate_format<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("table") | Some("json") => Ok(value),
        Some(format) => Err(D::Error::custom(format!(
            "Invalid format '{}'. Must be one of: table, json",
            format
        ))),
    }
}

fn validate_duration<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<String>::deserialize(deserializer)?;
    if let Some(ref duration) = value {
        parse_duration(duration).map_err(D::Error::custom)?;
    }
    Ok(value)
}

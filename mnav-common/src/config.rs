//! Configuration management for the mNAV dashboard.
//!
//! Configuration lives at `~/.mnav/config.json`. A missing file yields the
//! defaults.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (MNAV_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `MNAV_LOG_LEVEL` → observability.log_level
//! - `MNAV_LOG_FORMAT` → observability.log_format
//! - `MNAV_STATE_FILE` → dashboard.state_file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".mnav"),
        |dirs| dirs.home_dir().join(".mnav"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Module targets pinned to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Dashboard
// ============================================================================

/// mNAV thresholds used to classify a company as trading at a discount,
/// a moderate premium or a large premium to its Bitcoin holdings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MnavBands {
    /// mNAV strictly below this is a discount.
    #[serde(default = "default_discount_below")]
    pub discount_below: f64,

    /// mNAV strictly above this is a premium.
    #[serde(default = "default_premium_above")]
    pub premium_above: f64,
}

impl Default for MnavBands {
    fn default() -> Self {
        Self {
            discount_below: default_discount_below(),
            premium_above: default_premium_above(),
        }
    }
}

fn default_discount_below() -> f64 {
    1.0
}

fn default_premium_above() -> f64 {
    1.5
}

/// Dashboard settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Snapshot file the CLI reads when none is given on the command line.
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub mnav_bands: MnavBands,
}

impl DashboardConfig {
    /// Snapshot path, falling back to `~/.mnav/dashboard.json`.
    pub fn state_file_or_default(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| config_dir().join("dashboard.json"))
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Dashboard configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides applied.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("MNAV_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("MNAV_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(path) = std::env::var("MNAV_STATE_FILE") {
            if !path.trim().is_empty() {
                self.dashboard.state_file = Some(PathBuf::from(path));
            }
        }
    }
}

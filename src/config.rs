//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.metricboard.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".metricboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Write the report to this file instead of stdout.
    #[serde(default)]
    pub output: Option<String>,

    /// Keep refreshing the dashboard.
    #[serde(default)]
    pub watch: bool,

    /// Seconds between refreshes in watch mode.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: None,
            watch: false,
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    30
}

/// Kind of data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Built-in sample data.
    #[default]
    Mock,
    /// JSON files in a directory.
    File,
    /// JSON documents under a base URL.
    Http,
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Which source to read from.
    #[serde(default)]
    pub kind: SourceKind,

    /// Directory for the file source.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Base URL for the http source.
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Multiplier for the sample source's simulated latency.
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            data_dir: default_data_dir(),
            url: None,
            timeout_seconds: default_timeout(),
            latency_scale: default_latency_scale(),
        }
    }
}

fn default_data_dir() -> String {
    "fixtures".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_latency_scale() -> f64 {
    1.0
}

/// Dashboard computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of best-converting hours to list.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Number of swatches in the heatmap legend.
    #[serde(default = "default_legend_steps")]
    pub legend_steps: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            legend_steps: default_legend_steps(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

fn default_legend_steps() -> usize {
    8
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(source) = args.source {
            self.source.kind = source.into();
        }
        if let Some(ref dir) = args.data_dir {
            self.source.data_dir = dir.display().to_string();
        }
        if let Some(ref url) = args.url {
            self.source.url = Some(url.clone());
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if let Some(scale) = args.latency_scale {
            self.source.latency_scale = scale;
        }

        if let Some(top_k) = args.top_k {
            self.dashboard.top_k = top_k;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if let Some(interval) = args.interval {
            self.general.refresh_interval = interval;
        }

        // Flags always override
        if args.watch {
            self.general.watch = true;
        }
    }

    /// Check the merged settings before they reach the runtime.
    pub fn validate(&self) -> Result<()> {
        if self.general.watch && self.general.refresh_interval == 0 {
            bail!("refresh_interval must be at least 1 second in watch mode");
        }
        if self.source.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1 second");
        }
        if !self.source.latency_scale.is_finite() || self.source.latency_scale < 0.0 {
            bail!("latency_scale must be a non-negative number");
        }
        if self.dashboard.top_k == 0 {
            bail!("top_k must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

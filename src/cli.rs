//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::SourceKind;
use crate::models::Tab;
use clap::Parser;
use std::path::PathBuf;

/// Metricboard - SaaS analytics dashboard in your terminal
///
/// Computes KPI cards, revenue and marketing summaries, a conversion
/// heatmap and geography rankings, and renders them as Markdown or JSON.
///
/// Examples:
///   metricboard
///   metricboard --tab marketing --format json
///   metricboard --source file --data-dir ./exports --output dashboard.md
///   metricboard --source http --url https://metrics.example.com/api --watch
///   metricboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data source to read from
    ///
    /// mock serves built-in sample data, file reads <collection>.json files
    /// from --data-dir, http fetches them from --url.
    #[arg(short, long, value_name = "SOURCE", env = "METRICBOARD_SOURCE")]
    pub source: Option<SourceArg>,

    /// Directory containing kpi.json, revenue.json, marketing.json, ...
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL serving <collection>.json documents
    #[arg(long, value_name = "URL", env = "METRICBOARD_URL")]
    pub url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Dashboard tab to render
    #[arg(short, long, default_value = "all", value_name = "TAB")]
    pub tab: TabSelection,

    /// Output format (markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of best-converting hours to list
    #[arg(long, value_name = "N")]
    pub top_k: Option<usize>,

    /// Keep refreshing the dashboard until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between refreshes in watch mode (default: 30)
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Multiplier for the sample source's simulated latency (0 disables it)
    #[arg(long, value_name = "FACTOR")]
    pub latency_scale: Option<f64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .metricboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no spinner)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .metricboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Data source selector for --source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceArg {
    Mock,
    File,
    Http,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Mock => SourceKind::Mock,
            SourceArg::File => SourceKind::File,
            SourceArg::Http => SourceKind::Http,
        }
    }
}

/// Tab selector for --tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TabSelection {
    Overview,
    Revenue,
    Marketing,
    Geography,
    #[default]
    All,
}

impl TabSelection {
    /// Tabs to render, in navigation order.
    pub fn tabs(self) -> Vec<Tab> {
        match self {
            TabSelection::Overview => vec![Tab::Overview],
            TabSelection::Revenue => vec![Tab::Revenue],
            TabSelection::Marketing => vec![Tab::Marketing],
            TabSelection::Geography => vec![Tab::Geography],
            TabSelection::All => Tab::ALL.to_vec(),
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Data URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.top_k == Some(0) {
            return Err("Top-k must be at least 1".to_string());
        }

        if self.interval == Some(0) {
            return Err("Refresh interval must be at least 1 second".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(scale) = self.latency_scale {
            if !scale.is_finite() || scale < 0.0 {
                return Err("Latency scale must be a non-negative number".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref dir) = self.data_dir {
            if !dir.is_dir() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

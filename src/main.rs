//! Metricboard - SaaS analytics dashboard
//!
//! A CLI tool that fetches KPI, revenue, marketing, geography and heatmap
//! data, computes the dashboard metrics and renders them as Markdown or
//! JSON, once or on a refresh interval.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid data, unreachable source, config error, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod ingest;
mod live;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use live::{Connection, LiveStatus};
use models::{ReportMetadata, Tab};
use report::DashboardOptions;
use source::DataSource;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Metricboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .metricboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to choose a data source, refresh interval and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Everything a refresh needs, resolved from config and arguments.
struct Session {
    source: DataSource,
    tabs: Vec<Tab>,
    options: DashboardOptions,
    format: OutputFormat,
    output: Option<PathBuf>,
    show_progress: bool,
}

/// Run the dashboard once, or keep refreshing in watch mode.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let source = DataSource::from_config(&config.source)?;
    info!("Data source: {}", source.describe());

    let session = Session {
        source,
        tabs: args.tab.tabs(),
        options: DashboardOptions::from(&config.dashboard),
        format: args.format,
        output: config.general.output.as_ref().map(PathBuf::from),
        show_progress: !args.quiet,
    };

    let mut status = LiveStatus::new();

    if !config.general.watch {
        return refresh(&session, &mut status).await;
    }

    let interval = Duration::from_secs(config.general.refresh_interval);
    info!("Refreshing every {}s, press Ctrl-C to stop", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = refresh(&session, &mut status).await {
                    warn!("Refresh failed: {:#}", e);
                    if status.consecutive_failures() > 0 {
                        debug!("{} failed polls in a row", status.consecutive_failures());
                    }
                    eprintln!("{}", status.indicator());
                }
            }
            _ = &mut shutdown => {
                info!("Stopping");
                break;
            }
        }
    }

    Ok(())
}

/// Fetch data, rebuild the dashboard and write the report.
async fn refresh(session: &Session, status: &mut LiveStatus) -> Result<()> {
    let started = Instant::now();

    let spinner = session.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching from {}", session.source.describe()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let fetched = session.source.fetch().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let dataset = match fetched {
        Ok(dataset) => {
            if status.connection() == Connection::Offline {
                info!("Data source reachable again");
            }
            status.record_success(Utc::now());
            dataset
        }
        Err(e) => {
            status.record_failure();
            return Err(e);
        }
    };

    let fetch_millis = started.elapsed().as_millis() as u64;
    debug!("Fetched dataset in {}ms", fetch_millis);

    let metadata = ReportMetadata {
        source: session.source.describe(),
        generated_at: Utc::now(),
        fetch_millis,
        live_status: status.indicator(),
    };

    let dashboard = report::build_dashboard(&dataset, &session.tabs, &session.options, metadata);

    let output = match session.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    match session.output {
        Some(ref path) => {
            report::write_report(&output, path)?;
            info!("Report saved to {}", path.display());
            if session.show_progress {
                eprintln!("{} - report saved to {}", status.indicator(), path.display());
            }
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

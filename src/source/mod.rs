//! Data sources for the dashboard.
//!
//! A source produces one raw JSON payload per collection. Payloads are
//! fetched concurrently and then pass through the ingestion boundary, so a
//! [`Dataset`] returned from [`DataSource::fetch`] is always validated.

pub mod file;
pub mod http;
pub mod mock;

pub use file::FileSource;
pub use http::HttpSource;
pub use mock::MockSource;

use crate::config::{SourceConfig, SourceKind};
use crate::ingest::{self, RawDataset};
use crate::models::Dataset;
use anyhow::{bail, Context, Result};
use std::future::Future;
use tracing::debug;

/// Where dashboard data comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Built-in sample data with simulated network latency.
    Mock(MockSource),
    /// JSON files in a local directory.
    File(FileSource),
    /// JSON documents served under a base URL.
    Http(HttpSource),
}

impl DataSource {
    /// Build the source selected in the configuration.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        match config.kind {
            SourceKind::Mock => Ok(Self::Mock(MockSource::new(config.latency_scale))),
            SourceKind::File => Ok(Self::File(FileSource::new(&config.data_dir))),
            SourceKind::Http => {
                let Some(ref url) = config.url else {
                    bail!("The http source requires a URL (--url or [source].url)");
                };
                Ok(Self::Http(HttpSource::new(url, config.timeout_seconds)?))
            }
        }
    }

    /// Human-readable description for report metadata.
    pub fn describe(&self) -> String {
        match self {
            Self::Mock(_) => "built-in sample data".to_string(),
            Self::File(source) => format!("directory {}", source.dir().display()),
            Self::Http(source) => source.base_url().to_string(),
        }
    }

    /// Fetch, parse and validate a complete dataset.
    pub async fn fetch(&self) -> Result<Dataset> {
        let raw = match self {
            Self::Mock(source) => load_all(|name| source.read(name)).await?,
            Self::File(source) => load_all(|name| source.read(name)).await?,
            Self::Http(source) => load_all(|name| source.read(name)).await?,
        };

        let dataset = ingest::parse_dataset(&raw)
            .with_context(|| format!("Invalid data from {}", self.describe()))?;

        debug!(
            "Fetched {} revenue periods, {} channels, {} locations, {} heatmap cells",
            dataset.revenue.len(),
            dataset.marketing.len(),
            dataset.geography.len(),
            dataset.heatmap.len()
        );

        Ok(dataset)
    }
}

/// Load every collection concurrently with the given reader.
async fn load_all<F, Fut>(read: F) -> Result<RawDataset>
where
    F: Fn(&'static str) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let (kpi, revenue, marketing, geography, heatmap, growth) = futures::try_join!(
        read("kpi"),
        read("revenue"),
        read("marketing"),
        read("geography"),
        read("heatmap"),
        read("growth"),
    )?;

    Ok(RawDataset {
        kpi,
        revenue,
        marketing,
        geography,
        heatmap,
        growth,
    })
}

//! Ingestion boundary.
//!
//! Sources hand over raw JSON payloads; this module parses them into typed
//! records and validates them before anything downstream sees them.

pub mod validate;

pub use validate::validate_dataset;

use crate::error::IngestError;
use crate::models::Dataset;
use serde::de::DeserializeOwned;

/// Unparsed payloads of one fetch, one JSON document per collection.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub kpi: String,
    pub revenue: String,
    pub marketing: String,
    pub geography: String,
    pub heatmap: String,
    pub growth: String,
}

fn parse<T: DeserializeOwned>(dataset: &'static str, json: &str) -> Result<T, IngestError> {
    serde_json::from_str(json).map_err(|source| IngestError::Parse { dataset, source })
}

/// Parse and validate all payloads into a [`Dataset`].
pub fn parse_dataset(raw: &RawDataset) -> Result<Dataset, IngestError> {
    let dataset = Dataset {
        kpi: parse("kpi", &raw.kpi)?,
        revenue: parse("revenue", &raw.revenue)?,
        marketing: parse("marketing", &raw.marketing)?,
        geography: parse("geography", &raw.geography)?,
        heatmap: parse("heatmap", &raw.heatmap)?,
        growth: parse("growth", &raw.growth)?,
    };

    validate_dataset(&dataset)?;
    Ok(dataset)
}

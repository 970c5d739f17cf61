//! Error types for metric computation and data ingestion.

use thiserror::Error;

/// Failure of a metric computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// An aggregation that needs at least one record was given none.
    #[error("{operation} requires at least one record")]
    EmptyInput { operation: &'static str },
}

/// Failure to turn raw source data into validated records.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload is not valid JSON for the expected shape.
    #[error("failed to parse {dataset} data: {source}")]
    Parse {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A record violates a field constraint.
    #[error("invalid {dataset} record at index {index}: {reason}")]
    Invalid {
        dataset: &'static str,
        index: usize,
        reason: String,
    },

    /// Two heatmap cells share the same (day, hour) bucket.
    #[error("duplicate heatmap cell for day {day}, hour {hour}")]
    DuplicateCell { day: u8, hour: u8 },
}

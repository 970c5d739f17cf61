//! Metric computation.
//!
//! Pure functions that turn record collections into the summaries, rankings,
//! heatmap matrices and chart series shown on each dashboard tab.

pub mod aggregator;
pub mod charts;
pub mod heatmap;

pub use aggregator::*;
pub use charts::*;
pub use heatmap::*;

//! Field-level validation of ingested records.
//!
//! Every record that reaches the aggregator has passed these checks.

use crate::error::IngestError;
use crate::models::{
    Dataset, GeoRecord, GrowthPoint, HeatmapCell, KpiSnapshot, MarketingRecord, RevenueRecord,
};
use std::collections::HashSet;

fn invalid(dataset: &'static str, index: usize, reason: impl Into<String>) -> IngestError {
    IngestError::Invalid {
        dataset,
        index,
        reason: reason.into(),
    }
}

fn check_amount(
    dataset: &'static str,
    index: usize,
    field: &str,
    value: f64,
) -> Result<(), IngestError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            dataset,
            index,
            format!("{} must be a non-negative number, got {}", field, value),
        ));
    }
    Ok(())
}

fn check_percentage(
    dataset: &'static str,
    index: usize,
    field: &str,
    value: f64,
) -> Result<(), IngestError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            dataset,
            index,
            format!("{} must be between 0 and 100, got {}", field, value),
        ));
    }
    Ok(())
}

fn check_label(
    dataset: &'static str,
    index: usize,
    field: &str,
    value: &str,
) -> Result<(), IngestError> {
    if value.trim().is_empty() {
        return Err(invalid(dataset, index, format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Validate the KPI snapshot.
pub fn validate_kpi(kpi: &KpiSnapshot) -> Result<(), IngestError> {
    check_amount("kpi", 0, "mrr", kpi.mrr)?;
    check_amount("kpi", 0, "arr", kpi.arr)?;
    check_amount("kpi", 0, "arpu", kpi.arpu)?;
    check_percentage("kpi", 0, "churnRate", kpi.churn_rate)
}

/// Validate the revenue series.
pub fn validate_revenue(series: &[RevenueRecord]) -> Result<(), IngestError> {
    for (i, r) in series.iter().enumerate() {
        check_label("revenue", i, "month", &r.period)?;
        check_amount("revenue", i, "starter", r.starter)?;
        check_amount("revenue", i, "pro", r.pro)?;
        check_amount("revenue", i, "enterprise", r.enterprise)?;
        check_amount("revenue", i, "netRevenue", r.net_revenue)?;
        check_amount("revenue", i, "refunds", r.refunds)?;
    }
    Ok(())
}

/// Validate acquisition channels. Funnel stages must not grow.
pub fn validate_marketing(records: &[MarketingRecord]) -> Result<(), IngestError> {
    for (i, r) in records.iter().enumerate() {
        check_label("marketing", i, "source", &r.source)?;
        check_percentage("marketing", i, "conversionRate", r.conversion_rate)?;

        if r.trials > r.visitors {
            return Err(invalid(
                "marketing",
                i,
                format!("trials ({}) exceed visitors ({})", r.trials, r.visitors),
            ));
        }
        if r.paid > r.trials {
            return Err(invalid(
                "marketing",
                i,
                format!("paid ({}) exceed trials ({})", r.paid, r.trials),
            ));
        }
    }
    Ok(())
}

/// Validate locations.
pub fn validate_geography(records: &[GeoRecord]) -> Result<(), IngestError> {
    for (i, r) in records.iter().enumerate() {
        check_label("geography", i, "city", &r.city)?;
        check_label("geography", i, "country", &r.country)?;
        check_amount("geography", i, "revenue", r.revenue)?;

        if !(-90.0..=90.0).contains(&r.lat) {
            return Err(invalid("geography", i, format!("lat {} is out of range", r.lat)));
        }
        if !(-180.0..=180.0).contains(&r.lng) {
            return Err(invalid("geography", i, format!("lng {} is out of range", r.lng)));
        }
    }
    Ok(())
}

/// Validate heatmap cells: grid bounds, rate range and unique buckets.
pub fn validate_heatmap(cells: &[HeatmapCell]) -> Result<(), IngestError> {
    let mut seen = HashSet::with_capacity(cells.len());

    for (i, c) in cells.iter().enumerate() {
        if c.day > 6 {
            return Err(invalid("heatmap", i, format!("day {} is out of range", c.day)));
        }
        if c.hour > 23 {
            return Err(invalid("heatmap", i, format!("hour {} is out of range", c.hour)));
        }
        check_percentage("heatmap", i, "conversionRate", c.conversion_rate)?;

        if !seen.insert((c.day, c.hour)) {
            return Err(IngestError::DuplicateCell {
                day: c.day,
                hour: c.hour,
            });
        }
    }
    Ok(())
}

/// Validate the growth-versus-target series.
pub fn validate_growth(points: &[GrowthPoint]) -> Result<(), IngestError> {
    for (i, p) in points.iter().enumerate() {
        check_label("growth", i, "month", &p.period)?;
        check_amount("growth", i, "actual", p.actual)?;
        check_amount("growth", i, "target", p.target)?;
    }
    Ok(())
}

/// Validate every collection of a dataset.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), IngestError> {
    validate_kpi(&dataset.kpi)?;
    validate_revenue(&dataset.revenue)?;
    validate_marketing(&dataset.marketing)?;
    validate_geography(&dataset.geography)?;
    validate_heatmap(&dataset.heatmap)?;
    validate_growth(&dataset.growth)
}

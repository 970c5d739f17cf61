//! Data models for the dashboard.
//!
//! This module contains the record types supplied by data sources and the
//! derived structures produced by the metrics aggregator and consumed by the
//! report renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time KPI snapshot shown on the Overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    /// Monthly recurring revenue.
    pub mrr: f64,
    /// Annual recurring revenue.
    pub arr: f64,
    /// Average revenue per user.
    pub arpu: f64,
    /// Customer churn rate in percent.
    pub churn_rate: f64,
}

/// Revenue for one period, split by pricing tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRecord {
    /// Period label (e.g. "Jan").
    #[serde(rename = "month")]
    pub period: String,
    pub starter: f64,
    pub pro: f64,
    pub enterprise: f64,
    /// Net revenue for the period.
    pub net_revenue: f64,
    /// Refunds issued during the period.
    pub refunds: f64,
}

/// Funnel figures for one acquisition channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingRecord {
    /// Channel name (e.g. "SEO").
    pub source: String,
    pub visitors: u64,
    pub trials: u64,
    pub paid: u64,
    /// Reported conversion rate in percent.
    pub conversion_rate: f64,
}

/// Revenue and users for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    pub city: String,
    pub country: String,
    pub revenue: f64,
    pub users: u64,
    pub lat: f64,
    pub lng: f64,
}

/// One (day-of-week, hour-of-day) bucket of the conversion heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Day of week, 0 (Sunday) to 6 (Saturday).
    pub day: u8,
    /// Conversion rate in percent.
    pub conversion_rate: f64,
}

/// Actual versus target revenue for one period of the growth chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    #[serde(rename = "month")]
    pub period: String,
    pub actual: f64,
    pub target: f64,
}

/// Everything one fetch produces. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub kpi: KpiSnapshot,
    pub revenue: Vec<RevenueRecord>,
    pub marketing: Vec<MarketingRecord>,
    pub geography: Vec<GeoRecord>,
    pub heatmap: Vec<HeatmapCell>,
    pub growth: Vec<GrowthPoint>,
}

/// Day of week as used by heatmap cells (Sunday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All days in heatmap row order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Converts a heatmap day index into a weekday.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Heatmap row index of this day.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Three-letter label used in tables.
    pub fn short_label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_label())
    }
}

/// Dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Overview,
    Revenue,
    Marketing,
    Geography,
}

impl Tab {
    /// Tabs in navigation order.
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Revenue, Tab::Marketing, Tab::Geography];
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Overview => write!(f, "Overview"),
            Tab::Revenue => write!(f, "Revenue"),
            Tab::Marketing => write!(f, "Marketing"),
            Tab::Geography => write!(f, "Geography"),
        }
    }
}

/// Geography tab summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographySummary {
    pub total_revenue: f64,
    pub total_users: u64,
    /// Rounded to whole currency units; 0 when there are no users.
    pub avg_revenue_per_user: f64,
    /// Location with the highest revenue.
    pub top_city: GeoRecord,
}

/// Marketing tab summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingSummary {
    pub total_visitors: u64,
    pub total_trials: u64,
    pub total_paid: u64,
    /// Mean of the per-channel reported rates, one decimal.
    pub avg_conversion_rate: f64,
}

/// Revenue tab summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub current_net_revenue: f64,
    pub refund_rate: f64,
    pub avg_monthly_growth_rate: f64,
}

/// Average conversion rate for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayAverage {
    pub day: Weekday,
    pub average: f64,
}

/// Row of the ranked location table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    /// 1-based position by revenue.
    pub rank: usize,
    pub city: String,
    pub country: String,
    pub revenue: f64,
    pub users: u64,
    pub revenue_per_user: f64,
}

/// Point of the revenue-versus-users scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Users.
    pub x: u64,
    /// Revenue.
    pub y: f64,
    pub city: String,
    pub country: String,
}

/// Map marker for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub scale: f64,
}

/// Slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: String,
    pub value: f64,
    /// Share of the total in percent.
    pub percent: f64,
}

/// Actual revenue as a percentage of target for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attainment {
    pub period: String,
    pub actual: f64,
    pub target: f64,
    pub attainment: f64,
}

/// Tab content, or the placeholder shown when its inputs are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    NoData { reason: String },
}

#[cfg(test)]
impl<T> Panel<T> {
    /// Returns the content if the panel is ready.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(content) => Some(content),
            Panel::NoData { .. } => None,
        }
    }
}

/// Overview tab: KPI cards and the growth chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewPanel {
    pub kpi: KpiSnapshot,
    pub growth: Vec<Attainment>,
}

/// Revenue tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePanel {
    pub summary: RevenueSummary,
    pub tier_mix: Vec<Share>,
    pub series: Vec<RevenueRecord>,
}

/// Rendered conversion heatmap: dense grid, per-cell colors and legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPanel {
    pub matrix: [[f64; 24]; 7],
    pub colors: Vec<Vec<String>>,
    pub min: f64,
    pub max: f64,
    pub legend: Vec<LegendStop>,
    pub best_times: Vec<HeatmapCell>,
    pub day_averages: Vec<DayAverage>,
}

/// One swatch of the heatmap legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    pub value: f64,
    pub color: String,
}

/// Marketing tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingPanel {
    pub summary: MarketingSummary,
    pub channel_share: Vec<Share>,
    pub channels: Vec<MarketingRecord>,
    pub heatmap: Panel<HeatmapPanel>,
}

/// Geography tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographyPanel {
    pub summary: GeographySummary,
    pub locations: Vec<LocationRow>,
    pub scatter: Vec<ScatterPoint>,
    /// Pearson correlation between users and revenue, when defined.
    pub correlation: Option<f64>,
    pub markers: Vec<MapMarker>,
}

/// Metadata about one dashboard refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Description of the data source.
    pub source: String,
    /// When the dashboard was built.
    pub generated_at: DateTime<Utc>,
    /// Time spent fetching data, in milliseconds.
    pub fetch_millis: u64,
    /// Live indicator label at render time.
    pub live_status: String,
}

/// The complete dashboard for the selected tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Panel<OverviewPanel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Panel<RevenuePanel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<Panel<MarketingPanel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geography: Option<Panel<GeographyPanel>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(Weekday::from_index(0), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_index(6), Some(Weekday::Saturday));
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::Thursday.index(), 4);
    }

    #[test]
    fn test_revenue_record_uses_month_key() {
        let json = r#"{"month":"Jan","starter":1,"pro":2,"enterprise":3,"netRevenue":6,"refunds":0}"#;
        let record: RevenueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.period, "Jan");
        assert_eq!(record.net_revenue, 6.0);
    }

    #[test]
    fn test_heatmap_cell_camel_case() {
        let json = r#"{"hour":14,"day":4,"conversionRate":9.1}"#;
        let cell: HeatmapCell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.hour, 14);
        assert_eq!(cell.day, 4);
        assert_eq!(cell.conversion_rate, 9.1);
    }

    #[test]
    fn test_panel_serializes_status_tag() {
        let panel: Panel<RevenueSummary> = Panel::NoData {
            reason: "no records".to_string(),
        };
        let json = serde_json::to_string(&panel).unwrap();
        assert!(json.contains("\"status\":\"no_data\""));
        assert!(panel.ready().is_none());
    }
}

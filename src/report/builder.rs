//! Dashboard assembly.
//!
//! Runs the metric computations for each selected tab. A computation that
//! reports empty input turns its tab (or the heatmap) into a "no data"
//! placeholder; the rest of the dashboard still renders.

use crate::analysis::{
    average_by_day, build_conversion_heatmap_matrix, channel_share, location_rows, map_markers,
    revenue_tier_mix, revenue_user_correlation, revenue_vs_users, summarize_geography,
    summarize_marketing, summarize_revenue, target_attainment, top_k_by_conversion_rate, DAYS,
    HOURS,
};
use crate::config::DashboardConfig;
use crate::error::MetricsError;
use crate::models::{
    Dashboard, Dataset, GeographyPanel, HeatmapCell, HeatmapPanel, MarketingPanel,
    OverviewPanel, Panel, ReportMetadata, RevenuePanel, Tab,
};
use tracing::debug;

/// Settings that shape the computed dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Number of best-converting hours to list.
    pub top_k: usize,
    /// Number of heatmap legend swatches.
    pub legend_steps: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for DashboardOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            top_k: config.top_k,
            legend_steps: config.legend_steps,
        }
    }
}

fn no_data<T>(err: MetricsError) -> Panel<T> {
    debug!("Rendering placeholder: {}", err);
    Panel::NoData {
        reason: err.to_string(),
    }
}

/// Compute every selected tab of the dashboard.
pub fn build_dashboard(
    dataset: &Dataset,
    tabs: &[Tab],
    options: &DashboardOptions,
    metadata: ReportMetadata,
) -> Dashboard {
    let mut dashboard = Dashboard {
        metadata,
        overview: None,
        revenue: None,
        marketing: None,
        geography: None,
    };

    for tab in tabs {
        match tab {
            Tab::Overview => dashboard.overview = Some(overview_panel(dataset)),
            Tab::Revenue => dashboard.revenue = Some(revenue_panel(dataset)),
            Tab::Marketing => dashboard.marketing = Some(marketing_panel(dataset, options)),
            Tab::Geography => dashboard.geography = Some(geography_panel(dataset)),
        }
    }

    dashboard
}

fn overview_panel(dataset: &Dataset) -> Panel<OverviewPanel> {
    Panel::Ready(OverviewPanel {
        kpi: dataset.kpi.clone(),
        growth: target_attainment(&dataset.growth),
    })
}

fn revenue_panel(dataset: &Dataset) -> Panel<RevenuePanel> {
    Panel::Ready(RevenuePanel {
        summary: summarize_revenue(&dataset.revenue),
        tier_mix: revenue_tier_mix(&dataset.revenue),
        series: dataset.revenue.clone(),
    })
}

fn marketing_panel(dataset: &Dataset, options: &DashboardOptions) -> Panel<MarketingPanel> {
    let summary = match summarize_marketing(&dataset.marketing) {
        Ok(summary) => summary,
        Err(err) => return no_data(err),
    };

    Panel::Ready(MarketingPanel {
        summary,
        channel_share: channel_share(&dataset.marketing),
        channels: dataset.marketing.clone(),
        heatmap: heatmap_panel(&dataset.heatmap, options),
    })
}

fn heatmap_panel(cells: &[HeatmapCell], options: &DashboardOptions) -> Panel<HeatmapPanel> {
    let matrix = match build_conversion_heatmap_matrix(cells) {
        Ok(matrix) => matrix,
        Err(err) => return no_data(err),
    };

    debug!(
        "Heatmap has {} reported buckets, range {}-{}",
        matrix.reported_cells(),
        matrix.min,
        matrix.max
    );

    let colors = (0..DAYS)
        .map(|day| {
            (0..HOURS)
                .map(|hour| matrix.color_of(matrix.value_at(day, hour)).to_css())
                .collect()
        })
        .collect();

    Panel::Ready(HeatmapPanel {
        matrix: matrix.grid(),
        colors,
        min: matrix.min,
        max: matrix.max,
        legend: matrix.legend(options.legend_steps),
        best_times: top_k_by_conversion_rate(cells, options.top_k),
        day_averages: average_by_day(cells),
    })
}

fn geography_panel(dataset: &Dataset) -> Panel<GeographyPanel> {
    let summary = match summarize_geography(&dataset.geography) {
        Ok(summary) => summary,
        Err(err) => return no_data(err),
    };

    Panel::Ready(GeographyPanel {
        summary,
        locations: location_rows(&dataset.geography),
        scatter: revenue_vs_users(&dataset.geography),
        correlation: revenue_user_correlation(&dataset.geography),
        markers: map_markers(&dataset.geography),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::{HIGH, LOW};
    use crate::ingest::{parse_dataset, tests::fixture_raw};
    use crate::models::Weekday;
    use chrono::Utc;

    pub(crate) fn sample_dataset() -> Dataset {
        parse_dataset(&fixture_raw()).unwrap()
    }

    pub(crate) fn sample_metadata() -> ReportMetadata {
        ReportMetadata {
            source: "built-in sample data".to_string(),
            generated_at: Utc::now(),
            fetch_millis: 12,
            live_status: "● Live".to_string(),
        }
    }

    #[test]
    fn test_build_all_tabs_from_sample_data() {
        let dashboard = build_dashboard(
            &sample_dataset(),
            &Tab::ALL,
            &DashboardOptions::default(),
            sample_metadata(),
        );

        let revenue = dashboard.revenue.as_ref().and_then(Panel::ready).unwrap();
        assert_eq!(revenue.summary.current_net_revenue, 205000.0);
        assert_eq!(revenue.summary.refund_rate, 2.5);
        assert_eq!(revenue.summary.avg_monthly_growth_rate, 7.3);

        let marketing = dashboard.marketing.as_ref().and_then(Panel::ready).unwrap();
        assert_eq!(marketing.summary.avg_conversion_rate, 15.9);
        assert_eq!(marketing.summary.total_visitors, 40700);

        let heatmap = marketing.heatmap.ready().unwrap();
        assert_eq!(heatmap.min, 1.2);
        assert_eq!(heatmap.max, 9.1);
        assert_eq!(heatmap.matrix[4][14], 9.1);
        assert_eq!(heatmap.colors[4][14], HIGH.to_css());
        assert_eq!(heatmap.colors[0][3], LOW.to_css());
        assert_eq!(heatmap.legend.len(), 8);
        assert_eq!(heatmap.best_times.len(), 3);
        assert_eq!((heatmap.best_times[0].day, heatmap.best_times[0].hour), (4, 14));
        assert_eq!(heatmap.day_averages[0].day, Weekday::Thursday);

        let geography = dashboard.geography.as_ref().and_then(Panel::ready).unwrap();
        assert_eq!(geography.summary.top_city.city, "San Francisco");
        assert_eq!(geography.summary.total_users, 9770);
        assert_eq!(geography.locations[0].revenue_per_user, 86.0);
        assert!(geography.correlation.unwrap() > 0.99);

        let overview = dashboard.overview.as_ref().and_then(Panel::ready).unwrap();
        assert_eq!(overview.growth[0].attainment, 104.2);
    }

    #[test]
    fn test_single_tab() {
        let dashboard = build_dashboard(
            &sample_dataset(),
            &[Tab::Geography],
            &DashboardOptions::default(),
            sample_metadata(),
        );

        assert!(dashboard.geography.is_some());
        assert!(dashboard.overview.is_none());
        assert!(dashboard.revenue.is_none());
        assert!(dashboard.marketing.is_none());
    }

    #[test]
    fn test_empty_collections_render_placeholders() {
        let mut dataset = sample_dataset();
        dataset.geography.clear();
        dataset.heatmap.clear();

        let dashboard = build_dashboard(
            &dataset,
            &Tab::ALL,
            &DashboardOptions::default(),
            sample_metadata(),
        );

        assert!(matches!(dashboard.geography, Some(Panel::NoData { .. })));
        let marketing = dashboard.marketing.as_ref().and_then(Panel::ready).unwrap();
        assert!(matches!(marketing.heatmap, Panel::NoData { .. }));
    }
}

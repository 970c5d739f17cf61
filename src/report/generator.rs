//! Markdown and JSON dashboard rendering.
//!
//! This module renders a computed [`Dashboard`] into a Markdown document
//! with one section per tab, or into pretty-printed JSON.

use crate::analysis::HOURS;
use crate::models::{
    Dashboard, GeographyPanel, HeatmapPanel, MarketingPanel, OverviewPanel, Panel,
    ReportMetadata, RevenuePanel, Share, Weekday,
};
use crate::report::format::{compact_count, compact_currency, currency, number, percentage};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Analytics Dashboard\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&dashboard.metadata));

    if let Some(ref panel) = dashboard.overview {
        output.push_str(&generate_panel("Overview", panel, generate_overview_section));
    }
    if let Some(ref panel) = dashboard.revenue {
        output.push_str(&generate_panel("Revenue", panel, generate_revenue_section));
    }
    if let Some(ref panel) = dashboard.marketing {
        output.push_str(&generate_panel("Marketing", panel, generate_marketing_section));
    }
    if let Some(ref panel) = dashboard.geography {
        output.push_str(&generate_panel("Geography", panel, generate_geography_section));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("**{}**\n\n", metadata.live_status));
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Fetch Time:** {}ms\n", metadata.fetch_millis));
    section.push('\n');

    section
}

/// Render a tab heading followed by its content or placeholder.
fn generate_panel<T>(title: &str, panel: &Panel<T>, render: fn(&T) -> String) -> String {
    let mut section = format!("## {}\n\n", title);

    match panel {
        Panel::Ready(content) => section.push_str(&render(content)),
        Panel::NoData { reason } => {
            section.push_str(&format!("*No data available ({}).*\n\n", reason));
        }
    }

    section
}

fn generate_share_table(label: &str, shares: &[Share]) -> String {
    if shares.is_empty() {
        return String::new();
    }

    let mut table = String::new();
    table.push_str(&format!("| {} | Value | Share |\n", label));
    table.push_str("|:---|---:|---:|\n");
    for share in shares {
        table.push_str(&format!(
            "| {} | {} | {:.0}% |\n",
            share.label,
            number(share.value.round() as u64),
            share.percent
        ));
    }
    table.push('\n');

    table
}

/// Generate the Overview tab: KPI cards and growth against target.
fn generate_overview_section(panel: &OverviewPanel) -> String {
    let mut section = String::new();

    section.push_str("| Monthly Recurring Revenue | Annual Recurring Revenue | Average Revenue Per User | Churn Rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        currency(panel.kpi.mrr),
        currency(panel.kpi.arr),
        currency(panel.kpi.arpu),
        percentage(panel.kpi.churn_rate)
    ));

    if !panel.growth.is_empty() {
        section.push_str("### Growth vs Target\n\n");
        section.push_str("| Month | Actual | Target | Attainment |\n");
        section.push_str("|:---|---:|---:|---:|\n");
        for point in &panel.growth {
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                point.period,
                compact_currency(point.actual),
                compact_currency(point.target),
                percentage(point.attainment)
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the Revenue tab.
fn generate_revenue_section(panel: &RevenuePanel) -> String {
    let mut section = String::new();

    section.push_str("| Total Revenue (Current Month) | Refund Rate | Avg Monthly Growth |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        currency(panel.summary.current_net_revenue),
        percentage(panel.summary.refund_rate),
        percentage(panel.summary.avg_monthly_growth_rate)
    ));

    if !panel.series.is_empty() {
        section.push_str("### Revenue by Month\n\n");
        section.push_str("| Month | Starter | Pro | Enterprise | Net Revenue | Refunds |\n");
        section.push_str("|:---|---:|---:|---:|---:|---:|\n");
        for record in &panel.series {
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                record.period,
                currency(record.starter),
                currency(record.pro),
                currency(record.enterprise),
                currency(record.net_revenue),
                currency(record.refunds)
            ));
        }
        section.push('\n');
    }

    if !panel.tier_mix.is_empty() {
        section.push_str("### Revenue Mix (Current Month)\n\n");
        section.push_str(&generate_share_table("Plan", &panel.tier_mix));
    }

    section
}

/// Generate the Marketing tab.
fn generate_marketing_section(panel: &MarketingPanel) -> String {
    let mut section = String::new();

    section.push_str("| Total Visitors | Total Trials | Paid Conversions | Avg Conversion Rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        number(panel.summary.total_visitors),
        number(panel.summary.total_trials),
        number(panel.summary.total_paid),
        percentage(panel.summary.avg_conversion_rate)
    ));

    section.push_str("### Conversion Rates by Source\n\n");
    section.push_str("| Source | Visitors | Trials | Paid | Conversion Rate |\n");
    section.push_str("|:---|---:|---:|---:|---:|\n");
    for channel in &panel.channels {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            channel.source,
            number(channel.visitors),
            number(channel.trials),
            number(channel.paid),
            percentage(channel.conversion_rate)
        ));
    }
    section.push('\n');

    if !panel.channel_share.is_empty() {
        section.push_str("### Traffic Sources\n\n");
        section.push_str(&generate_share_table("Source", &panel.channel_share));
    }

    section.push_str("### Conversion Heatmap\n\n");
    match &panel.heatmap {
        Panel::Ready(heatmap) => section.push_str(&generate_heatmap_section(heatmap)),
        Panel::NoData { reason } => {
            section.push_str(&format!("*No data available ({}).*\n\n", reason));
        }
    }

    section
}

/// Generate the heatmap grid, legend, best times and day averages.
fn generate_heatmap_section(heatmap: &HeatmapPanel) -> String {
    let mut section = String::new();

    section.push_str("| Day |");
    for hour in 0..HOURS {
        section.push_str(&format!(" {} |", hour));
    }
    section.push('\n');
    section.push_str("|:---|");
    section.push_str(&":---:|".repeat(HOURS));
    section.push('\n');

    for day in Weekday::ALL {
        let row = day.index();
        section.push_str(&format!("| {} |", day));
        for hour in 0..HOURS {
            let value = heatmap.matrix[row][hour];
            let label = if value > 0.0 {
                format!("{:.1}", value)
            } else {
                String::new()
            };
            section.push_str(&format!(
                " <span style=\"background-color:{}\">{}</span> |",
                heatmap.colors[row][hour], label
            ));
        }
        section.push('\n');
    }
    section.push('\n');

    // Legend
    section.push_str("Low ");
    for stop in &heatmap.legend {
        section.push_str(&format!(
            "<span style=\"background-color:{}\">&nbsp;&nbsp;</span>",
            stop.color
        ));
    }
    section.push_str(&format!(
        " High ({} - {})\n\n",
        percentage(heatmap.min),
        percentage(heatmap.max)
    ));

    if !heatmap.best_times.is_empty() {
        section.push_str("#### Best Performing Times\n\n");
        for (i, cell) in heatmap.best_times.iter().enumerate() {
            let day = Weekday::from_index(cell.day)
                .map(|d| d.short_label())
                .unwrap_or("?");
            section.push_str(&format!(
                "{}. {} {}:00 - {}\n",
                i + 1,
                day,
                cell.hour,
                percentage(cell.conversion_rate)
            ));
        }
        section.push('\n');
    }

    section.push_str("#### Daily Averages\n\n");
    section.push_str("| Day | Average |\n");
    section.push_str("|:---|---:|\n");
    for average in &heatmap.day_averages {
        section.push_str(&format!(
            "| {} | {} |\n",
            average.day,
            percentage(average.average)
        ));
    }
    section.push('\n');

    section
}

/// Generate the Geography tab.
fn generate_geography_section(panel: &GeographyPanel) -> String {
    let mut section = String::new();

    section.push_str("| Total Revenue | Total Users | Avg Revenue/User | Top City |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} ({}) |\n\n",
        currency(panel.summary.total_revenue),
        number(panel.summary.total_users),
        currency(panel.summary.avg_revenue_per_user),
        panel.summary.top_city.city,
        currency(panel.summary.top_city.revenue)
    ));

    section.push_str("### Revenue by Location\n\n");
    section.push_str("| Rank | Location | Revenue | Users | Revenue/User |\n");
    section.push_str("|:---:|:---|---:|---:|---:|\n");
    for row in &panel.locations {
        section.push_str(&format!(
            "| #{} | {}, {} | {} | {} | {} |\n",
            row.rank,
            row.city,
            row.country,
            currency(row.revenue),
            number(row.users),
            currency(row.revenue_per_user)
        ));
    }
    section.push('\n');

    if !panel.markers.is_empty() {
        section.push_str("### Map Markers\n\n");
        section.push_str("| City | Coordinates | Revenue | Users | Marker Scale |\n");
        section.push_str("|:---|:---|---:|---:|---:|\n");
        for (marker, point) in panel.markers.iter().zip(&panel.scatter) {
            section.push_str(&format!(
                "| {} | {:.2}, {:.2} | {} | {} | {:.2} |\n",
                marker.city,
                marker.lat,
                marker.lng,
                compact_currency(point.y),
                compact_count(point.x),
                marker.scale
            ));
        }
        section.push('\n');
    }

    if let Some(r) = panel.correlation {
        section.push_str(&format!(
            "*Revenue vs users correlation across {} locations: r = {:.3}*\n\n",
            panel.scatter.len(),
            r
        ));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by metricboard v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

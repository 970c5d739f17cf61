//! Summary statistics and rankings.
//!
//! This module derives the summary cards and ranked tables of the Revenue,
//! Marketing and Geography tabs from raw record collections. Every function
//! is pure: inputs are borrowed and never modified.

use crate::error::MetricsError;
use crate::models::{
    GeoRecord, GeographySummary, LocationRow, MarketingRecord, MarketingSummary, RevenueRecord,
    RevenueSummary,
};

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Ratio of two amounts, or 0 when the denominator is zero.
pub(crate) fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Compute revenue and user totals, revenue per user and the top city.
pub fn summarize_geography(records: &[GeoRecord]) -> Result<GeographySummary, MetricsError> {
    let first = records.first().ok_or(MetricsError::EmptyInput {
        operation: "summarize_geography",
    })?;

    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let total_users: u64 = records.iter().map(|r| r.users).sum();

    // Strict comparison keeps the first record on ties.
    let top_city = records
        .iter()
        .fold(first, |best, r| if r.revenue > best.revenue { r } else { best });

    Ok(GeographySummary {
        total_revenue,
        total_users,
        avg_revenue_per_user: guarded_ratio(total_revenue, total_users as f64).round(),
        top_city: top_city.clone(),
    })
}

/// Compute funnel totals and the mean reported conversion rate.
///
/// The average is taken over the per-channel rates as reported, not
/// recomputed from the totals.
pub fn summarize_marketing(records: &[MarketingRecord]) -> Result<MarketingSummary, MetricsError> {
    if records.is_empty() {
        return Err(MetricsError::EmptyInput {
            operation: "summarize_marketing",
        });
    }

    let rate_sum: f64 = records.iter().map(|r| r.conversion_rate).sum();

    Ok(MarketingSummary {
        total_visitors: records.iter().map(|r| r.visitors).sum(),
        total_trials: records.iter().map(|r| r.trials).sum(),
        total_paid: records.iter().map(|r| r.paid).sum(),
        avg_conversion_rate: round1(rate_sum / records.len() as f64),
    })
}

/// Compute current revenue, refund rate and average monthly growth.
///
/// Never fails: an empty series yields zeros.
pub fn summarize_revenue(series: &[RevenueRecord]) -> RevenueSummary {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return RevenueSummary {
                current_net_revenue: 0.0,
                refund_rate: 0.0,
                avg_monthly_growth_rate: 0.0,
            }
        }
    };

    let refund_rate = round1(guarded_ratio(last.refunds, last.net_revenue) * 100.0);

    let avg_monthly_growth_rate = if series.len() < 2 || first.net_revenue == 0.0 {
        0.0
    } else {
        let growth = (last.net_revenue - first.net_revenue) / first.net_revenue;
        round1(growth / (series.len() - 1) as f64 * 100.0)
    };

    RevenueSummary {
        current_net_revenue: last.net_revenue,
        refund_rate,
        avg_monthly_growth_rate,
    }
}

/// Sort locations by revenue, highest first.
///
/// The sort is stable, so locations with equal revenue keep their input order.
pub fn rank_by_revenue_descending(records: &[GeoRecord]) -> Vec<GeoRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranked
}

/// Build the ranked location table with revenue per user.
pub fn location_rows(records: &[GeoRecord]) -> Vec<LocationRow> {
    rank_by_revenue_descending(records)
        .into_iter()
        .enumerate()
        .map(|(i, r)| LocationRow {
            rank: i + 1,
            revenue_per_user: guarded_ratio(r.revenue, r.users as f64).round(),
            city: r.city,
            country: r.country,
            revenue: r.revenue,
            users: r.users,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(city: &str, revenue: f64, users: u64) -> GeoRecord {
        GeoRecord {
            city: city.to_string(),
            country: "USA".to_string(),
            revenue,
            users,
            lat: 0.0,
            lng: 0.0,
        }
    }

    fn channel(source: &str, conversion_rate: f64) -> MarketingRecord {
        MarketingRecord {
            source: source.to_string(),
            visitors: 1000,
            trials: 100,
            paid: 10,
            conversion_rate,
        }
    }

    fn month(period: &str, net_revenue: f64, refunds: f64) -> RevenueRecord {
        RevenueRecord {
            period: period.to_string(),
            starter: 0.0,
            pro: 0.0,
            enterprise: net_revenue,
            net_revenue,
            refunds,
        }
    }

    #[test]
    fn test_summarize_geography_totals() {
        let records = vec![
            geo("San Francisco", 245000.0, 2840),
            geo("New York", 198000.0, 2240),
            geo("London", 167000.0, 1890),
        ];

        let summary = summarize_geography(&records).unwrap();

        assert_eq!(summary.total_revenue, 610000.0);
        assert_eq!(summary.total_users, 6970);
        assert_eq!(summary.avg_revenue_per_user, 88.0);
        assert_eq!(summary.top_city.city, "San Francisco");
    }

    #[test]
    fn test_summarize_geography_zero_users() {
        let summary = summarize_geography(&[geo("Nowhere", 5000.0, 0)]).unwrap();
        assert_eq!(summary.avg_revenue_per_user, 0.0);
        assert!(summary.avg_revenue_per_user.is_finite());
    }

    #[test]
    fn test_summarize_geography_top_city_tie_keeps_first() {
        let records = vec![geo("A", 100.0, 1), geo("B", 100.0, 1)];
        let summary = summarize_geography(&records).unwrap();
        assert_eq!(summary.top_city.city, "A");
    }

    #[test]
    fn test_summarize_geography_empty() {
        assert_eq!(
            summarize_geography(&[]),
            Err(MetricsError::EmptyInput {
                operation: "summarize_geography"
            })
        );
    }

    #[test]
    fn test_summarize_marketing_averages_reported_rates() {
        let records = vec![
            channel("SEO", 14.9),
            channel("Paid", 17.5),
            channel("Referral", 17.3),
            channel("Direct", 14.0),
        ];

        let summary = summarize_marketing(&records).unwrap();

        assert_eq!(summary.avg_conversion_rate, 15.9);
        assert_eq!(summary.total_visitors, 4000);
        assert_eq!(summary.total_trials, 400);
        assert_eq!(summary.total_paid, 40);
    }

    #[test]
    fn test_summarize_marketing_empty() {
        assert!(matches!(
            summarize_marketing(&[]),
            Err(MetricsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_summarize_revenue_two_points() {
        let series = vec![month("Jan", 150000.0, 5000.0), month("Jun", 205000.0, 5200.0)];

        let summary = summarize_revenue(&series);

        assert_eq!(summary.current_net_revenue, 205000.0);
        assert_eq!(summary.refund_rate, 2.5);
        assert_eq!(summary.avg_monthly_growth_rate, 36.7);
    }

    #[test]
    fn test_summarize_revenue_single_point_has_no_growth() {
        let summary = summarize_revenue(&[month("Jan", 150000.0, 5000.0)]);
        assert_eq!(summary.avg_monthly_growth_rate, 0.0);
        assert_eq!(summary.refund_rate, 3.3);
    }

    #[test]
    fn test_summarize_revenue_guards_zero_denominators() {
        let empty = summarize_revenue(&[]);
        assert_eq!(empty.current_net_revenue, 0.0);
        assert_eq!(empty.refund_rate, 0.0);
        assert_eq!(empty.avg_monthly_growth_rate, 0.0);

        let zeros = summarize_revenue(&[month("Jan", 0.0, 0.0), month("Feb", 0.0, 10.0)]);
        assert_eq!(zeros.refund_rate, 0.0);
        assert_eq!(zeros.avg_monthly_growth_rate, 0.0);
    }

    #[test]
    fn test_rank_by_revenue_is_stable() {
        let records = vec![geo("A", 100.0, 1), geo("B", 100.0, 1), geo("C", 200.0, 1)];

        let ranked = rank_by_revenue_descending(&records);
        let cities: Vec<_> = ranked.iter().map(|r| r.city.as_str()).collect();

        assert_eq!(cities, vec!["C", "A", "B"]);
        assert_eq!(records[0].city, "A");
    }

    #[test]
    fn test_location_rows() {
        let records = vec![geo("New York", 198000.0, 2240), geo("San Francisco", 245000.0, 2840)];

        let rows = location_rows(&records);

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].city, "San Francisco");
        assert_eq!(rows[0].revenue_per_user, 86.0);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].revenue_per_user, 88.0);
    }

    #[test]
    fn test_summaries_are_idempotent() {
        let records = vec![geo("A", 123.45, 7), geo("B", 678.9, 3)];
        assert_eq!(summarize_geography(&records), summarize_geography(&records));

        let channels = vec![channel("SEO", 14.9), channel("Paid", 17.5)];
        assert_eq!(summarize_marketing(&channels), summarize_marketing(&channels));

        let series = vec![month("Jan", 150000.0, 5000.0), month("Feb", 162000.0, 4100.0)];
        assert_eq!(summarize_revenue(&series), summarize_revenue(&series));

        // Inputs are left untouched.
        assert_eq!(records[0].city, "A");
        assert_eq!(channels[1].conversion_rate, 17.5);
        assert_eq!(series[1].net_revenue, 162000.0);
    }
}

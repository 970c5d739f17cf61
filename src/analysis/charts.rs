//! Chart series: pie shares, scatter points, map markers and target attainment.

use crate::analysis::aggregator::{guarded_ratio, round1};
use crate::models::{
    Attainment, GeoRecord, GrowthPoint, MapMarker, MarketingRecord, RevenueRecord, ScatterPoint,
    Share,
};

/// Revenue that renders a map marker at its natural size.
const MARKER_REFERENCE_REVENUE: f64 = 50_000.0;

/// Smallest map marker scale.
const MARKER_MIN_SCALE: f64 = 0.8;

fn shares(slices: Vec<(String, f64)>) -> Vec<Share> {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    slices
        .into_iter()
        .map(|(label, value)| Share {
            label,
            value,
            percent: value / total * 100.0,
        })
        .collect()
}

/// Pricing tier mix of the latest period.
pub fn revenue_tier_mix(series: &[RevenueRecord]) -> Vec<Share> {
    let Some(latest) = series.last() else {
        return Vec::new();
    };

    shares(vec![
        ("Starter".to_string(), latest.starter),
        ("Pro".to_string(), latest.pro),
        ("Enterprise".to_string(), latest.enterprise),
    ])
}

/// Share of visitors per acquisition channel.
pub fn channel_share(records: &[MarketingRecord]) -> Vec<Share> {
    shares(
        records
            .iter()
            .map(|r| (r.source.clone(), r.visitors as f64))
            .collect(),
    )
}

/// Revenue-versus-users scatter points.
pub fn revenue_vs_users(records: &[GeoRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            x: r.users,
            y: r.revenue,
            city: r.city.clone(),
            country: r.country.clone(),
        })
        .collect()
}

/// Pearson correlation between users and revenue.
///
/// Returns `None` for fewer than two locations or when either variable is
/// constant.
pub fn revenue_user_correlation(records: &[GeoRecord]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }

    let n = records.len() as f64;
    let mean_x = records.iter().map(|r| r.users as f64).sum::<f64>() / n;
    let mean_y = records.iter().map(|r| r.revenue).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for r in records {
        let dx = r.users as f64 - mean_x;
        let dy = r.revenue - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Map marker scale for a location's revenue.
pub fn marker_scale(revenue: f64) -> f64 {
    (revenue.max(0.0) / MARKER_REFERENCE_REVENUE)
        .sqrt()
        .max(MARKER_MIN_SCALE)
}

/// Map markers for every location, in input order.
pub fn map_markers(records: &[GeoRecord]) -> Vec<MapMarker> {
    records
        .iter()
        .map(|r| MapMarker {
            city: r.city.clone(),
            lat: r.lat,
            lng: r.lng,
            scale: marker_scale(r.revenue),
        })
        .collect()
}

/// Actual revenue as a percentage of target, per period.
pub fn target_attainment(points: &[GrowthPoint]) -> Vec<Attainment> {
    points
        .iter()
        .map(|p| Attainment {
            period: p.period.clone(),
            actual: p.actual,
            target: p.target,
            attainment: round1(guarded_ratio(p.actual, p.target) * 100.0),
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
            lat: 37.7749,
            lng: -122.4194,
        }
    }

    #[test]
    fn test_revenue_tier_mix() {
        let series = vec![RevenueRecord {
            period: "Jun".to_string(),
            starter: 25.0,
            pro: 25.0,
            enterprise: 50.0,
            net_revenue: 100.0,
            refunds: 0.0,
        }];

        let mix = revenue_tier_mix(&series);

        assert_eq!(mix.len(), 3);
        assert_eq!(mix[0].label, "Starter");
        assert_eq!(mix[0].percent, 25.0);
        assert_eq!(mix[2].percent, 50.0);
        assert!(revenue_tier_mix(&[]).is_empty());
    }

    #[test]
    fn test_channel_share_sums_to_hundred() {
        let records: Vec<MarketingRecord> = [("SEO", 15000), ("Paid", 8500), ("Direct", 12000)]
            .into_iter()
            .map(|(source, visitors)| MarketingRecord {
                source: source.to_string(),
                visitors,
                trials: 0,
                paid: 0,
                conversion_rate: 0.0,
            })
            .collect();

        let share = channel_share(&records);
        let total: f64 = share.iter().map(|s| s.percent).sum();

        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(share[0].label, "SEO");
    }

    #[test]
    fn test_channel_share_without_visitors() {
        let records = vec![MarketingRecord {
            source: "SEO".to_string(),
            visitors: 0,
            trials: 0,
            paid: 0,
            conversion_rate: 0.0,
        }];
        assert!(channel_share(&records).is_empty());
    }

    #[test]
    fn test_revenue_user_correlation() {
        let linear = vec![geo("A", 100.0, 1), geo("B", 200.0, 2), geo("C", 300.0, 3)];
        let r = revenue_user_correlation(&linear).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        assert_eq!(revenue_user_correlation(&linear[..1]), None);
        let flat = vec![geo("A", 100.0, 1), geo("B", 100.0, 2)];
        assert_eq!(revenue_user_correlation(&flat), None);
    }

    #[test]
    fn test_marker_scale() {
        assert_eq!(marker_scale(200_000.0), 2.0);
        assert_eq!(marker_scale(10_000.0), MARKER_MIN_SCALE);
        assert_eq!(map_markers(&[geo("A", 50_000.0, 1)])[0].scale, 1.0);
    }

    #[test]
    fn test_target_attainment() {
        let points = vec![
            GrowthPoint {
                period: "Jan".to_string(),
                actual: 125000.0,
                target: 120000.0,
            },
            GrowthPoint {
                period: "Feb".to_string(),
                actual: 10.0,
                target: 0.0,
            },
        ];

        let attainment = target_attainment(&points);

        assert_eq!(attainment[0].attainment, 104.2);
        assert_eq!(attainment[1].attainment, 0.0);
    }

    #[test]
    fn test_scatter_points() {
        let points = revenue_vs_users(&[geo("San Francisco", 245000.0, 2840)]);
        assert_eq!(points[0].x, 2840);
        assert_eq!(points[0].y, 245000.0);
        assert_eq!(points[0].city, "San Francisco");
    }
}

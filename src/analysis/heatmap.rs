//! Conversion heatmap aggregation and color scale.
//!
//! Heatmap data is sparse: only the (day, hour) buckets that saw traffic are
//! reported. [`HeatmapMatrix`] keeps the reported buckets in a map and reads
//! missing buckets as zero.

use crate::analysis::aggregator::guarded_ratio;
use crate::error::MetricsError;
use crate::models::{DayAverage, HeatmapCell, LegendStop, Weekday};
use std::collections::BTreeMap;
use std::fmt;

/// Rows in the heatmap grid (days of the week).
pub const DAYS: usize = 7;

/// Columns in the heatmap grid (hours of the day).
pub const HOURS: usize = 24;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgb()` notation.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color of buckets with no conversions.
pub const BACKGROUND: Rgb = Rgb::new(248, 249, 250);

/// Color of the lowest reported rate.
pub const LOW: Rgb = Rgb::new(224, 242, 254);

/// Color of the highest reported rate.
pub const HIGH: Rgb = Rgb::new(84, 152, 254);

/// Conversion rates by (day, hour), with the range of reported values.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMatrix {
    cells: BTreeMap<(u8, u8), f64>,
    /// Lowest reported rate. Missing buckets do not count.
    pub min: f64,
    /// Highest reported rate.
    pub max: f64,
}

impl HeatmapMatrix {
    /// Rate for a bucket, 0 if it was not reported.
    pub fn value_at(&self, day: usize, hour: usize) -> f64 {
        if day >= DAYS || hour >= HOURS {
            return 0.0;
        }
        self.cells
            .get(&(day as u8, hour as u8))
            .copied()
            .unwrap_or(0.0)
    }

    /// Dense 7x24 view with missing buckets filled with 0.
    pub fn grid(&self) -> [[f64; HOURS]; DAYS] {
        let mut grid = [[0.0; HOURS]; DAYS];
        for (&(day, hour), &value) in &self.cells {
            grid[usize::from(day)][usize::from(hour)] = value;
        }
        grid
    }

    /// Number of reported buckets.
    pub fn reported_cells(&self) -> usize {
        self.cells.len()
    }

    /// Position of a value within the reported range, clamped to [0, 1].
    ///
    /// When every reported rate is the same the range is empty and any
    /// reported value maps to the top of the scale.
    pub fn intensity(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 1.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    /// Display color for a rate.
    pub fn color_of(&self, value: f64) -> Rgb {
        if value == 0.0 {
            BACKGROUND
        } else {
            LOW.lerp(HIGH, self.intensity(value))
        }
    }

    /// Evenly spaced legend swatches from `min` to `max`.
    pub fn legend(&self, steps: usize) -> Vec<LegendStop> {
        let span = steps.saturating_sub(1).max(1) as f64;
        (0..steps)
            .map(|i| {
                let value = self.min + (i as f64 / span) * (self.max - self.min);
                LegendStop {
                    value,
                    color: self.color_of(value).to_css(),
                }
            })
            .collect()
    }
}

/// Place reported cells in a 7x24 matrix and record their min and max.
///
/// Cells outside the grid are left out of the matrix but still count toward
/// the range. A repeated bucket keeps its last value.
pub fn build_conversion_heatmap_matrix(
    cells: &[HeatmapCell],
) -> Result<HeatmapMatrix, MetricsError> {
    if cells.is_empty() {
        return Err(MetricsError::EmptyInput {
            operation: "build_conversion_heatmap_matrix",
        });
    }

    let mut map = BTreeMap::new();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for cell in cells {
        min = min.min(cell.conversion_rate);
        max = max.max(cell.conversion_rate);

        if usize::from(cell.day) < DAYS && usize::from(cell.hour) < HOURS {
            map.insert((cell.day, cell.hour), cell.conversion_rate);
        }
    }

    Ok(HeatmapMatrix {
        cells: map,
        min,
        max,
    })
}

/// The `k` best-converting buckets.
///
/// Equal rates are ordered by (day, hour) so the result does not depend on
/// input order.
pub fn top_k_by_conversion_rate(cells: &[HeatmapCell], k: usize) -> Vec<HeatmapCell> {
    let mut sorted = cells.to_vec();
    sorted.sort_by(|a, b| {
        b.conversion_rate
            .total_cmp(&a.conversion_rate)
            .then_with(|| (a.day, a.hour).cmp(&(b.day, b.hour)))
    });
    sorted.truncate(k);
    sorted
}

/// Mean conversion rate per weekday, best day first.
///
/// Days without cells average 0. Equal averages keep weekday order.
pub fn average_by_day(cells: &[HeatmapCell]) -> Vec<DayAverage> {
    let mut sums = [(0.0_f64, 0_usize); DAYS];

    for cell in cells {
        if let Some(slot) = sums.get_mut(usize::from(cell.day)) {
            slot.0 += cell.conversion_rate;
            slot.1 += 1;
        }
    }

    let mut averages: Vec<DayAverage> = Weekday::ALL
        .iter()
        .map(|&day| {
            let (sum, count) = sums[day.index()];
            DayAverage {
                day,
                average: guarded_ratio(sum, count as f64),
            }
        })
        .collect();

    averages.sort_by(|a, b| b.average.total_cmp(&a.average));
    averages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(day: u8, hour: u8, conversion_rate: f64) -> HeatmapCell {
        HeatmapCell {
            hour,
            day,
            conversion_rate,
        }
    }

    #[test]
    fn test_matrix_places_cells_and_fills_zero() {
        let cells = vec![cell(1, 14, 8.2), cell(4, 14, 9.1), cell(0, 3, 1.2)];

        let matrix = build_conversion_heatmap_matrix(&cells).unwrap();
        let grid = matrix.grid();

        for c in &cells {
            assert_eq!(grid[usize::from(c.day)][usize::from(c.hour)], c.conversion_rate);
            assert_eq!(matrix.value_at(usize::from(c.day), usize::from(c.hour)), c.conversion_rate);
        }
        assert_eq!(grid[2][14], 0.0);
        assert_eq!(matrix.value_at(6, 23), 0.0);
        assert_eq!(matrix.reported_cells(), 3);
    }

    #[test]
    fn test_matrix_range_ignores_missing_cells() {
        let matrix =
            build_conversion_heatmap_matrix(&[cell(1, 8, 4.2), cell(1, 9, 5.2)]).unwrap();
        assert_eq!(matrix.min, 4.2);
        assert_eq!(matrix.max, 5.2);
    }

    #[test]
    fn test_matrix_empty() {
        assert_eq!(
            build_conversion_heatmap_matrix(&[]),
            Err(MetricsError::EmptyInput {
                operation: "build_conversion_heatmap_matrix"
            })
        );
    }

    #[test]
    fn test_color_scale_endpoints() {
        let matrix =
            build_conversion_heatmap_matrix(&[cell(0, 0, 1.2), cell(4, 14, 9.1)]).unwrap();

        assert_eq!(matrix.color_of(0.0), BACKGROUND);
        assert_eq!(matrix.color_of(1.2), LOW);
        assert_eq!(matrix.color_of(9.1), HIGH);
        assert_eq!(HIGH.to_css(), "rgb(84, 152, 254)");
        assert_eq!(BACKGROUND.to_string(), "#f8f9fa");
    }

    #[test]
    fn test_color_scale_single_value() {
        let matrix = build_conversion_heatmap_matrix(&[cell(2, 10, 7.2)]).unwrap();
        assert_eq!(matrix.color_of(7.2), HIGH);
    }

    #[test]
    fn test_legend_spans_range() {
        let matrix =
            build_conversion_heatmap_matrix(&[cell(0, 0, 1.0), cell(0, 1, 8.0)]).unwrap();

        let legend = matrix.legend(8);

        assert_eq!(legend.len(), 8);
        assert_eq!(legend[0].value, 1.0);
        assert_eq!(legend[7].value, 8.0);
        assert_eq!(legend[0].color, LOW.to_css());
        assert_eq!(legend[7].color, HIGH.to_css());
    }

    #[test]
    fn test_top_k_breaks_ties_by_day_and_hour() {
        let cells = vec![
            cell(3, 14, 8.5),
            cell(2, 14, 8.9),
            cell(1, 15, 8.5),
            cell(1, 14, 8.5),
        ];

        let top = top_k_by_conversion_rate(&cells, 3);

        assert_eq!(top.len(), 3);
        assert_eq!((top[0].day, top[0].hour), (2, 14));
        assert_eq!((top[1].day, top[1].hour), (1, 14));
        assert_eq!((top[2].day, top[2].hour), (1, 15));
    }

    #[test]
    fn test_top_k_shorter_input() {
        let top = top_k_by_conversion_rate(&[cell(0, 0, 1.0)], 3);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_average_by_day() {
        let cells = vec![cell(1, 8, 4.0), cell(1, 9, 6.0), cell(4, 14, 9.0)];

        let averages = average_by_day(&cells);

        assert_eq!(averages.len(), 7);
        assert_eq!(averages[0].day, Weekday::Thursday);
        assert_eq!(averages[0].average, 9.0);
        assert_eq!(averages[1].day, Weekday::Monday);
        assert_eq!(averages[1].average, 5.0);
        // Days without data average zero and keep weekday order.
        assert_eq!(averages[2].day, Weekday::Sunday);
        assert_eq!(averages[2].average, 0.0);
        assert_eq!(averages[6].day, Weekday::Saturday);
    }

    #[test]
    fn test_heatmap_operations_are_idempotent() {
        let cells = vec![
            cell(1, 14, 8.2),
            cell(4, 14, 9.1),
            cell(0, 3, 1.2),
            cell(2, 10, 8.2),
        ];
        let before = cells.clone();

        assert_eq!(
            build_conversion_heatmap_matrix(&cells),
            build_conversion_heatmap_matrix(&cells)
        );
        assert_eq!(
            top_k_by_conversion_rate(&cells, 3),
            top_k_by_conversion_rate(&cells, 3)
        );
        assert_eq!(average_by_day(&cells), average_by_day(&cells));
        assert_eq!(cells, before);
    }
}

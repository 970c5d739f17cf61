//! Built-in sample data with simulated network latency.

use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::debug;

/// Sample payloads and their simulated response time in milliseconds.
fn fixture(name: &str) -> Option<(&'static str, u64)> {
    match name {
        "kpi" => Some((include_str!("../../fixtures/kpi.json"), 500)),
        "revenue" => Some((include_str!("../../fixtures/revenue.json"), 300)),
        "marketing" => Some((include_str!("../../fixtures/marketing.json"), 400)),
        "geography" => Some((include_str!("../../fixtures/geography.json"), 600)),
        "heatmap" => Some((include_str!("../../fixtures/heatmap.json"), 350)),
        "growth" => Some((include_str!("../../fixtures/growth.json"), 0)),
        _ => None,
    }
}

/// Serves the bundled sample dataset.
#[derive(Debug, Clone)]
pub struct MockSource {
    /// Multiplier applied to every simulated latency. 0 disables the delay.
    latency_scale: f64,
}

impl MockSource {
    pub fn new(latency_scale: f64) -> Self {
        Self { latency_scale }
    }

    fn delay(&self, base_millis: u64) -> Duration {
        if !self.latency_scale.is_finite() || self.latency_scale <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_millis((base_millis as f64 * self.latency_scale).round() as u64)
    }

    /// Return one collection after its simulated latency.
    pub async fn read(&self, name: &'static str) -> Result<String> {
        let (payload, base_millis) =
            fixture(name).ok_or_else(|| anyhow!("No sample data for collection '{}'", name))?;

        let delay = self.delay(base_millis);
        if !delay.is_zero() {
            debug!("Simulating {:?} latency for {}", delay, name);
            tokio::time::sleep(delay).await;
        }

        Ok(payload.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;

    #[test]
    fn test_delay_scaling() {
        assert_eq!(MockSource::new(1.0).delay(500), Duration::from_millis(500));
        assert_eq!(MockSource::new(0.5).delay(600), Duration::from_millis(300));
        assert_eq!(MockSource::new(0.0).delay(500), Duration::ZERO);
        assert_eq!(MockSource::new(-2.0).delay(500), Duration::ZERO);
    }

    #[test]
    fn test_unknown_collection() {
        let source = MockSource::new(0.0);
        assert!(tokio_test::block_on(source.read("churn")).is_err());
    }

    #[test]
    fn test_fetch_sample_dataset() {
        let source = DataSource::Mock(MockSource::new(0.0));

        let dataset = tokio_test::block_on(source.fetch()).unwrap();

        assert_eq!(dataset.kpi.arr, 1500000.0);
        assert_eq!(dataset.geography.len(), 5);
        assert_eq!(dataset.heatmap.len(), 70);
    }
}

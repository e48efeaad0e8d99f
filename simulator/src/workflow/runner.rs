use crate::workflow::config::WorkflowConfig;
use anyhow::{bail, Context};
use quakecore::coordinator::{Coordinator, LoadStatus};
use quakecore::encoding::{fit_viewport, GeoBounds, MagnitudeTier};
use quakecore::feed::FeedClient;
use quakecore::model::{EarthquakeRecord, FilterConfiguration};
use quakecore::telemetry::MetricsSnapshot;

pub struct WorkflowResult {
    pub filters: FilterConfiguration,
    pub record_count: usize,
    pub tier_counts: Vec<(MagnitudeTier, usize)>,
    pub strongest: Option<EarthquakeRecord>,
    pub tsunami_flagged: usize,
    pub viewport: Option<GeoBounds>,
    pub metrics: MetricsSnapshot,
}

pub fn tier_counts(records: &[EarthquakeRecord]) -> Vec<(MagnitudeTier, usize)> {
    MagnitudeTier::ALL
        .iter()
        .map(|tier| {
            let count = records
                .iter()
                .filter(|r| MagnitudeTier::from_magnitude(r.magnitude) == *tier)
                .count();
            (*tier, count)
        })
        .collect()
}

pub fn strongest(records: &[EarthquakeRecord]) -> Option<&EarthquakeRecord> {
    records
        .iter()
        .filter(|r| r.magnitude.is_some_and(|m| !m.is_nan()))
        .max_by(|a, b| a.magnitude.partial_cmp(&b.magnitude).unwrap_or(std::cmp::Ordering::Equal))
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// One coordinator-driven fetch against the configured feed.
    pub async fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let filters = self.config.filters()?;
        let client = FeedClient::from_endpoint(&self.config.feed_url)
            .with_context(|| format!("parsing feed url {}", self.config.feed_url))?;

        let (mut coordinator, ticket) = Coordinator::new(filters);
        let outcome = ticket.execute(&client).await;
        let cause = outcome.result.as_ref().err().cloned();
        coordinator.complete(outcome);

        let records = match coordinator.status() {
            LoadStatus::Loaded => coordinator.displayed_records().unwrap_or_default(),
            LoadStatus::Failed(message) => match cause {
                Some(err) => bail!("{message} ({err})"),
                None => bail!("{message}"),
            },
            LoadStatus::Loading => bail!("fetch for {filters} never completed"),
        };

        Ok(WorkflowResult {
            filters,
            record_count: records.len(),
            tier_counts: tier_counts(records),
            strongest: strongest(records).cloned(),
            tsunami_flagged: records.iter().filter(|r| r.is_tsunami_flagged()).count(),
            viewport: fit_viewport(records),
            metrics: coordinator.metrics().snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_bridge::bridge::{fixture_bind_address, FeedBridge};
    use crate::feed_bridge::model::FixtureModel;
    use crate::generator::catalog::{generate_catalog, GeneratorConfig};
    use chrono::Utc;
    use quakecore::model::LookbackDays;

    async fn fixture(count: usize) -> (FeedBridge, usize) {
        let catalog = generate_catalog(
            &GeneratorConfig {
                count,
                span_days: 3,
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        let expected = catalog
            .iter()
            .filter(|f| f.properties.mag.is_some_and(|m| m >= 2.5))
            .count();
        let bridge = FeedBridge::bind(FixtureModel::new(catalog), fixture_bind_address(0))
            .await
            .unwrap();
        (bridge, expected)
    }

    fn config_for(bridge: &FeedBridge) -> WorkflowConfig {
        WorkflowConfig::from_args(bridge.query_url(), 2.5, 30).unwrap()
    }

    #[tokio::test]
    async fn runner_executes_workflow_against_fixture() {
        let (bridge, expected) = fixture(120).await;
        let result = Runner::new(config_for(&bridge)).execute().await.unwrap();

        assert_eq!(result.record_count, expected);
        assert_eq!(result.filters.days(), LookbackDays::Month);
        assert_eq!(
            result.tier_counts.iter().map(|(_, n)| n).sum::<usize>(),
            expected
        );
        assert_eq!(result.metrics.issued, 1);
        assert_eq!(result.metrics.loaded, 1);
        if expected > 0 {
            assert!(result.viewport.is_some());
            assert!(result.strongest.is_some());
        }
    }

    #[tokio::test]
    async fn runner_reports_failure_status() {
        let (bridge, _) = fixture(10).await;
        bridge.set_fail_status(Some(503)).unwrap();

        let err = Runner::new(config_for(&bridge))
            .execute()
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn runner_handles_empty_catalog() {
        let (bridge, _) = fixture(0).await;
        let result = Runner::new(config_for(&bridge)).execute().await.unwrap();
        assert_eq!(result.record_count, 0);
        assert!(result.viewport.is_none());
        assert!(result.strongest.is_none());
    }

    #[test]
    fn strongest_ignores_missing_magnitudes() {
        let records = vec![
            sample("a", Some(4.0)),
            sample("b", None),
            sample("c", Some(6.1)),
        ];
        assert_eq!(strongest(&records).map(|r| r.id.as_str()), Some("c"));
        let counts = tier_counts(&records);
        assert_eq!(counts[0], (MagnitudeTier::Micro, 1));
        assert_eq!(counts[4], (MagnitudeTier::Strong, 1));
    }

    fn sample(id: &str, magnitude: Option<f64>) -> EarthquakeRecord {
        EarthquakeRecord {
            id: id.into(),
            magnitude,
            place: String::new(),
            occurred_at_millis: 0,
            latitude: 0.0,
            longitude: 0.0,
            depth_km: 0.0,
            detail_url: String::new(),
            tsunami_flag: 0,
            significance: 0,
        }
    }
}

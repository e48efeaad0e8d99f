use crate::generator::catalog::GeneratorConfig;
use anyhow::Context;
use quakecore::feed::USGS_QUERY_ENDPOINT;
use quakecore::model::{FilterConfiguration, LookbackDays};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_feed_url() -> String {
    USGS_QUERY_ENDPOINT.to_string()
}

fn default_min_magnitude() -> f64 {
    FilterConfiguration::default().min_magnitude()
}

fn default_days() -> LookbackDays {
    FilterConfiguration::default().days()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: f64,
    #[serde(default = "default_days")]
    pub days: LookbackDays,
    #[serde(default)]
    pub fixture: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .filters()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(feed_url: String, min_magnitude: f64, days: u32) -> anyhow::Result<Self> {
        let days = LookbackDays::try_from(days).context("parsing --days")?;
        let config = Self {
            feed_url,
            min_magnitude,
            days,
            fixture: GeneratorConfig::default(),
        };
        config.filters().context("parsing --min-magnitude")?;
        Ok(config)
    }

    pub fn filters(&self) -> anyhow::Result<FilterConfiguration> {
        Ok(FilterConfiguration::new(self.min_magnitude, self.days)?)
    }
}

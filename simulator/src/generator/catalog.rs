use anyhow::ensure;
use chrono::{DateTime, Duration, Utc};
use quakecore::feed::geojson::{Feature, FeatureProperties, Geometry};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_10;

const BEARINGS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Configuration for generating a synthetic event catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: u64,
    pub span_days: u32,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub tsunami_rate: f64,
    pub null_magnitude_rate: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 200,
            seed: 0,
            span_days: 30,
            min_magnitude: 1.5,
            max_magnitude: 7.9,
            tsunami_rate: 0.02,
            null_magnitude_rate: 0.01,
        }
    }
}

impl GeneratorConfig {
    fn normalized_span_ms(&self) -> i64 {
        Duration::days(i64::from(self.span_days.max(1))).num_milliseconds()
    }
}

/// Gutenberg-Richter draw with b = 1, truncated to the configured range.
fn draw_magnitude(rng: &mut StdRng, config: &GeneratorConfig) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    let m = config.min_magnitude - (1.0 - u).ln() / LN_10;
    (m.min(config.max_magnitude) * 10.0).round() / 10.0
}

fn significance(magnitude: Option<f64>) -> i32 {
    magnitude
        .map(|m| (m * 100.0 * m / 6.5).round() as i32)
        .unwrap_or(0)
        .max(0)
}

/// Builds `count` features spread over `span_days` before `now`, newest first.
pub fn generate_catalog(config: &GeneratorConfig, now: DateTime<Utc>) -> anyhow::Result<Vec<Feature>> {
    ensure!(
        config.min_magnitude < config.max_magnitude,
        "generator magnitude range is empty ({} >= {})",
        config.min_magnitude,
        config.max_magnitude
    );
    ensure!(
        (0.0..=1.0).contains(&config.tsunami_rate)
            && (0.0..=1.0).contains(&config.null_magnitude_rate),
        "generator rates must lie in [0, 1]"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let now_ms = now.timestamp_millis();
    let span_ms = config.normalized_span_ms();
    let mut features = Vec::with_capacity(config.count);

    for index in 0..config.count {
        let id = format!("fx{:04}{:06}", config.seed % 10_000, index);
        let magnitude = if rng.gen_bool(config.null_magnitude_rate) {
            None
        } else {
            Some(draw_magnitude(&mut rng, config))
        };
        let latitude = rng.gen_range(-60.0..70.0);
        let longitude = rng.gen_range(-180.0..180.0);
        let depth_km = if rng.gen_bool(0.85) {
            rng.gen_range(0.0..70.0)
        } else {
            rng.gen_range(70.0..700.0)
        };
        let time = now_ms - rng.gen_range(0..span_ms);
        let place = format!(
            "{} km {} of Fixture Station {}",
            rng.gen_range(1..120),
            BEARINGS[rng.gen_range(0..BEARINGS.len())],
            rng.gen_range(1..50)
        );
        let tsunami_odds = if magnitude.unwrap_or(0.0) >= 6.5 {
            config.tsunami_rate.max(0.5)
        } else {
            config.tsunami_rate
        };
        let tsunami = i32::from(rng.gen_bool(tsunami_odds));

        features.push(Feature::new(
            id.clone(),
            FeatureProperties {
                mag: magnitude,
                place: Some(place),
                time,
                url: Some(format!("https://earthquake.usgs.gov/earthquakes/eventpage/{id}")),
                tsunami,
                sig: significance(magnitude),
            },
            Geometry::point(longitude, latitude, depth_km),
        ));
    }

    features.sort_by(|a, b| b.properties.time.cmp(&a.properties.time));
    Ok(features)
}

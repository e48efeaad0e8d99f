use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Canonical, map-ready earthquake record.
///
/// Coordinates are stored latitude first; the feed's `[lon, lat, depth]` order
/// never leaks past normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    pub id: String,
    pub magnitude: Option<f64>,
    pub place: String,
    pub occurred_at_millis: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub detail_url: String,
    pub tsunami_flag: i32,
    pub significance: i32,
}

impl EarthquakeRecord {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn is_tsunami_flagged(&self) -> bool {
        self.tsunami_flag == 1
    }

    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.occurred_at_millis).single()
    }
}

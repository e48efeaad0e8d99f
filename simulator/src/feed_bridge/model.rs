use chrono::{DateTime, FixedOffset};
use quakecore::feed::geojson::{Feature, FeatureCollection};
use std::collections::HashMap;

/// Why the fixture refused a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRejection {
    pub status: u16,
    pub message: String,
}

impl QueryRejection {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
        }
    }
}

/// Catalog served by the fixture feed, plus an optional forced failure.
#[derive(Debug, Clone, Default)]
pub struct FixtureModel {
    pub features: Vec<Feature>,
    pub fail_status: Option<u16>,
}

fn parse_instant(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<DateTime<FixedOffset>>, QueryRejection> {
    params
        .get(key)
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map_err(|e| QueryRejection::bad_request(format!("bad {key} {raw:?}: {e}")))
        })
        .transpose()
}

impl FixtureModel {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            fail_status: None,
        }
    }

    /// Applies the subset of FDSN event query semantics the client uses.
    pub fn query(&self, params: &HashMap<String, String>) -> Result<FeatureCollection, QueryRejection> {
        match params.get("format").map(String::as_str) {
            Some("geojson") => {}
            other => {
                return Err(QueryRejection::bad_request(format!(
                    "unsupported format {other:?}; only geojson is served"
                )))
            }
        }

        let min_magnitude = params
            .get("minmagnitude")
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|_| QueryRejection::bad_request(format!("bad minmagnitude {raw:?}")))
            })
            .transpose()?;
        let start = parse_instant(params, "starttime")?.map(|t| t.timestamp_millis());
        let end = parse_instant(params, "endtime")?.map(|t| t.timestamp_millis());

        let mut features: Vec<Feature> = self
            .features
            .iter()
            .filter(|f| match min_magnitude {
                Some(min) => f.properties.mag.is_some_and(|m| m >= min),
                None => true,
            })
            .filter(|f| start.map_or(true, |s| f.properties.time >= s))
            .filter(|f| end.map_or(true, |e| f.properties.time <= e))
            .cloned()
            .collect();

        match params.get("orderby").map(String::as_str) {
            None | Some("time") => features.sort_by(|a, b| b.properties.time.cmp(&a.properties.time)),
            Some("time-asc") => features.sort_by(|a, b| a.properties.time.cmp(&b.properties.time)),
            Some(other) => {
                return Err(QueryRejection::bad_request(format!("unsupported orderby {other:?}")))
            }
        }

        Ok(FeatureCollection::new(features))
    }
}

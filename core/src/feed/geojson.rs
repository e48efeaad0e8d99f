use crate::model::EarthquakeRecord;
use crate::prelude::{FetchError, FetchResult};
use serde::{Deserialize, Serialize};

fn feature_collection_kind() -> String {
    "FeatureCollection".into()
}

fn feature_kind() -> String {
    "Feature".into()
}

fn point_kind() -> String {
    "Point".into()
}

/// Top-level GeoJSON body returned by the event service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_kind")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_kind(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    pub id: String,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: impl Into<String>, properties: FeatureProperties, geometry: Geometry) -> Self {
        Self {
            kind: feature_kind(),
            id: id.into(),
            properties,
            geometry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub mag: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    pub time: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tsunami: i32,
    #[serde(default)]
    pub sig: i32,
}

/// Point geometry; the feed orders the triple as `[longitude, latitude, depth]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default = "point_kind")]
    pub kind: String,
    pub coordinates: [f64; 3],
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64, depth_km: f64) -> Self {
        Self {
            kind: point_kind(),
            coordinates: [longitude, latitude, depth_km],
        }
    }
}

impl From<Feature> for EarthquakeRecord {
    fn from(feature: Feature) -> Self {
        let [longitude, latitude, depth_km] = feature.geometry.coordinates;
        let props = feature.properties;
        EarthquakeRecord {
            id: feature.id,
            magnitude: props.mag,
            place: props.place.unwrap_or_default(),
            occurred_at_millis: props.time,
            latitude,
            longitude,
            depth_km,
            detail_url: props.url.unwrap_or_default(),
            tsunami_flag: props.tsunami,
            significance: props.sig,
        }
    }
}

pub fn parse_feature_collection(body: &str) -> FetchResult<FeatureCollection> {
    serde_json::from_str(body).map_err(|err| FetchError::Parse(err.to_string()))
}

/// Maps features to records in feed order. Duplicate ids are kept.
pub fn normalize(collection: FeatureCollection) -> Vec<EarthquakeRecord> {
    collection
        .features
        .into_iter()
        .map(EarthquakeRecord::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1709640000000, "count": 2},
        "features": [
            {
                "type": "Feature",
                "id": "us7000abcd",
                "properties": {
                    "mag": 5.6, "place": "12 km SSW of Somewhere", "time": 1709630000000,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd",
                    "tsunami": 1, "sig": 482, "felt": null
                },
                "geometry": {"type": "Point", "coordinates": [10.0, 20.0, 5.0]}
            },
            {
                "type": "Feature",
                "id": "ak0241",
                "properties": {
                    "mag": null, "place": null, "time": 1709620000000,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ak0241",
                    "tsunami": 0, "sig": 0
                },
                "geometry": {"type": "Point", "coordinates": [-150.1, 61.2, 33.4]}
            }
        ]
    }"#;

    #[test]
    fn normalization_reorders_coordinates() {
        let records = normalize(parse_feature_collection(SAMPLE).unwrap());
        let first = &records[0];
        assert_eq!(first.latitude, 20.0);
        assert_eq!(first.longitude, 10.0);
        assert_eq!(first.depth_km, 5.0);
        assert_eq!(first.id, "us7000abcd");
        assert_eq!(first.magnitude, Some(5.6));
        assert_eq!(first.significance, 482);
        assert!(first.is_tsunami_flagged());
    }

    #[test]
    fn null_magnitude_and_place_pass_through() {
        let records = normalize(parse_feature_collection(SAMPLE).unwrap());
        assert_eq!(records[1].magnitude, None);
        assert_eq!(records[1].place, "");
        assert_eq!(records[1].coordinates(), (61.2, -150.1));
    }

    #[test]
    fn feed_order_and_duplicates_are_preserved() {
        let mut collection = parse_feature_collection(SAMPLE).unwrap();
        let dup = collection.features[0].clone();
        collection.features.push(dup);
        let ids: Vec<String> = normalize(collection).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["us7000abcd", "ak0241", "us7000abcd"]);
    }

    #[test]
    fn empty_collection_yields_no_records() {
        let collection =
            parse_feature_collection(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(normalize(collection).is_empty());
    }

    #[test]
    fn malformed_bodies_are_parse_errors() {
        for body in [
            "<html>busy</html>",
            r#"{"type":"FeatureCollection"}"#,
            r#"{"features":[{"id":"x","properties":{"mag":1.0,"time":1},"geometry":{"coordinates":[1.0,2.0]}}]}"#,
        ] {
            let err = parse_feature_collection(body).unwrap_err();
            assert_eq!(err.kind(), "parse");
        }
    }

    #[test]
    fn serialized_collection_round_trips_through_parser() {
        let collection = FeatureCollection::new(vec![Feature::new(
            "fx1",
            FeatureProperties {
                mag: Some(3.1),
                place: Some("Fixture".into()),
                time: 42,
                url: None,
                tsunami: 0,
                sig: 150,
            },
            Geometry::point(1.5, -2.5, 7.0),
        )]);
        let body = serde_json::to_string(&collection).unwrap();
        assert!(body.contains(r#""type":"FeatureCollection""#));
        assert_eq!(parse_feature_collection(&body).unwrap(), collection);
    }
}

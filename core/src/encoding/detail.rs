use crate::model::EarthquakeRecord;
use chrono::TimeZone;

/// Text content for a record's detail popup.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail {
    pub headline: String,
    pub time: String,
    pub depth: String,
    pub coordinates: String,
    pub tsunami_warning: bool,
    pub link: String,
}

impl EventDetail {
    pub fn new<Tz: TimeZone>(record: &EarthquakeRecord, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let magnitude = record
            .magnitude
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "?".into());
        let place = if record.place.is_empty() {
            "Unknown location"
        } else {
            record.place.as_str()
        };
        let time = record
            .occurred_at()
            .map(|at| at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());

        Self {
            headline: format!("M {magnitude} - {place}"),
            time,
            depth: format!("{:.1} km", record.depth_km),
            coordinates: format!("{:.3}, {:.3}", record.latitude, record.longitude),
            tsunami_warning: record.is_tsunami_flagged(),
            link: record.detail_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> EarthquakeRecord {
        EarthquakeRecord {
            id: "us1".into(),
            magnitude: Some(6.27),
            place: "45 km E of Hualien City, Taiwan".into(),
            occurred_at_millis: 1_712_102_400_000,
            latitude: 23.8193,
            longitude: 121.5619,
            depth_km: 34.76,
            detail_url: "https://earthquake.usgs.gov/earthquakes/eventpage/us1".into(),
            tsunami_flag: 1,
            significance: 912,
        }
    }

    #[test]
    fn popup_formats_every_field() {
        let detail = EventDetail::new(&sample(), &Utc);
        assert_eq!(detail.headline, "M 6.3 - 45 km E of Hualien City, Taiwan");
        assert_eq!(detail.time, "2024-04-03 00:00:00");
        assert_eq!(detail.depth, "34.8 km");
        assert_eq!(detail.coordinates, "23.819, 121.562");
        assert!(detail.tsunami_warning);
        assert!(detail.link.ends_with("/us1"));
    }

    #[test]
    fn missing_magnitude_and_place_still_render() {
        let mut record = sample();
        record.magnitude = None;
        record.place.clear();
        record.tsunami_flag = 0;
        let detail = EventDetail::new(&record, &Utc);
        assert_eq!(detail.headline, "M ? - Unknown location");
        assert!(!detail.tsunami_warning);
    }
}

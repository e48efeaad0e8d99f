use crate::model::{FilterConfiguration, LookbackDays};
use chrono::{DateTime, Days, Duration, SecondsFormat, TimeZone, Utc};
use url::Url;

/// Absolute `[start, end]` window sent to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Subtracts calendar days in `end`'s own timezone, so month and year
    /// boundaries follow the local calendar rather than 24h multiples.
    pub fn ending_at<Tz: TimeZone>(end: DateTime<Tz>, days: LookbackDays) -> Self {
        let count = days.days();
        let start = end
            .clone()
            .checked_sub_days(Days::new(u64::from(count)))
            .unwrap_or_else(|| end.clone() - Duration::days(i64::from(count)));
        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    pub fn contains_millis(&self, millis: i64) -> bool {
        (self.start.timestamp_millis()..=self.end.timestamp_millis()).contains(&millis)
    }
}

pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Ordered query parameters for one `fdsnws/event/1/query` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    params: Vec<(&'static str, String)>,
}

impl FeedQuery {
    pub fn new(filters: &FilterConfiguration, window: &TimeWindow) -> Self {
        Self {
            params: vec![
                ("format", "geojson".to_string()),
                ("starttime", format_timestamp(&window.start)),
                ("endtime", format_timestamp(&window.end)),
                ("minmagnitude", filters.min_magnitude().to_string()),
                ("orderby", "time".to_string()),
            ],
        }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces any query already present on `endpoint`.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

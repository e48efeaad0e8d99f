use crate::feed::geojson::{normalize, parse_feature_collection};
use crate::feed::query::{FeedQuery, TimeWindow};
use crate::feed::transport::{FeedTransport, ReqwestTransport};
use crate::model::{EarthquakeRecord, FilterConfiguration, LookbackDays};
use crate::prelude::{ClientError, FetchError, FetchResult};
use chrono::{DateTime, Local, Utc};
use url::Url;

pub const USGS_QUERY_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Source of "now" for the query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock in the local timezone.
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn window(&self, days: LookbackDays) -> TimeWindow {
        match self {
            Clock::System => TimeWindow::ending_at(Local::now(), days),
            Clock::Fixed(now) => TimeWindow::ending_at(*now, days),
        }
    }
}

/// Client for the FDSN event query endpoint.
#[derive(Debug)]
pub struct FeedClient<T = ReqwestTransport> {
    endpoint: Url,
    transport: T,
    clock: Clock,
}

impl FeedClient<ReqwestTransport> {
    pub fn from_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self::new(endpoint, ReqwestTransport::build()?))
    }

    pub fn usgs() -> Result<Self, ClientError> {
        Self::from_endpoint(USGS_QUERY_ENDPOINT)
    }
}

impl<T: FeedTransport> FeedClient<T> {
    pub fn new(endpoint: Url, transport: T) -> Self {
        Self {
            endpoint,
            transport,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_query(&self, filters: &FilterConfiguration) -> FeedQuery {
        FeedQuery::new(filters, &self.clock.window(filters.days()))
    }

    pub async fn fetch_records(
        &self,
        filters: &FilterConfiguration,
    ) -> FetchResult<Vec<EarthquakeRecord>> {
        let query = self.build_query(filters);
        self.fetch_query(&query).await
    }

    /// Single attempt: status is checked before the body is looked at.
    pub async fn fetch_query(&self, query: &FeedQuery) -> FetchResult<Vec<EarthquakeRecord>> {
        let url = query.to_url(&self.endpoint);
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }
        let collection = parse_feature_collection(&response.body)?;
        Ok(normalize(collection))
    }
}

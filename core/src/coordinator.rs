//! Filter/refetch coordination.
//!
//! Every fetch trigger hands back a [`FetchTicket`] tagged with a monotonically
//! increasing generation. Only the completion carrying the latest generation
//! is applied; anything older is discarded as stale, so the displayed state
//! always belongs to the most recently *initiated* request regardless of the
//! order in which responses arrive.

use crate::feed::{FeedClient, FeedTransport};
use crate::model::{EarthquakeRecord, FilterConfiguration};
use crate::prelude::FetchResult;
use crate::telemetry::FetchMetrics;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load earthquake data. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// A fetch the owner must run and report back via [`Coordinator::complete`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub filters: FilterConfiguration,
}

impl FetchTicket {
    pub async fn execute<T: FeedTransport>(self, client: &FeedClient<T>) -> FetchOutcome {
        FetchOutcome {
            generation: self.generation,
            result: client.fetch_records(&self.filters).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub generation: u64,
    pub result: FetchResult<Vec<EarthquakeRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct Coordinator {
    filters: FilterConfiguration,
    status: LoadStatus,
    records: Vec<EarthquakeRecord>,
    generation: u64,
    metrics: FetchMetrics,
}

impl Coordinator {
    /// Starts in `Loading` with the initial fetch already issued.
    pub fn new(filters: FilterConfiguration) -> (Self, FetchTicket) {
        let mut coordinator = Self {
            filters,
            status: LoadStatus::Loading,
            records: Vec::new(),
            generation: 0,
            metrics: FetchMetrics::new(),
        };
        let ticket = coordinator.begin_fetch();
        (coordinator, ticket)
    }

    pub fn filters(&self) -> FilterConfiguration {
        self.filters
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn metrics(&self) -> &FetchMetrics {
        &self.metrics
    }

    /// Replaces the filter. An equal value is not a change and issues nothing.
    pub fn replace_filters(&mut self, next: FilterConfiguration) -> Option<FetchTicket> {
        if next == self.filters {
            return None;
        }
        log::info!("filters changed: {} -> {}", self.filters, next);
        self.filters = next;
        Some(self.begin_fetch())
    }

    /// Re-issues the fetch for the current filter, changed or not.
    pub fn retry(&mut self) -> FetchTicket {
        log::info!("retrying fetch for {}", self.filters);
        self.begin_fetch()
    }

    pub fn complete(&mut self, outcome: FetchOutcome) -> Completion {
        if outcome.generation != self.generation {
            log::debug!(
                "discarding stale fetch generation {} (current {})",
                outcome.generation,
                self.generation
            );
            self.metrics.record_stale();
            return Completion::Stale;
        }

        match outcome.result {
            Ok(records) => {
                log::info!("loaded {} earthquakes for {}", records.len(), self.filters);
                self.records = records;
                self.status = LoadStatus::Loaded;
                self.metrics.record_loaded();
            }
            Err(err) => {
                log::warn!("{} error while fetching {}: {}", err.kind(), self.filters, err);
                self.status = LoadStatus::Failed(LOAD_FAILED_MESSAGE.to_string());
                self.metrics.record_failed();
            }
        }
        Completion::Applied
    }

    /// Records for the rendering surface; hidden unless the last fetch loaded.
    pub fn displayed_records(&self) -> Option<&[EarthquakeRecord]> {
        match self.status {
            LoadStatus::Loaded => Some(&self.records),
            _ => None,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        self.metrics.record_issued();
        FetchTicket {
            generation: self.generation,
            filters: self.filters,
        }
    }
}

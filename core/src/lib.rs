//! Data access and presentation state for the earthquake visualizer.
//!
//! `feed` talks to the FDSN event service and normalizes its GeoJSON into flat
//! records, `coordinator` owns the filter/load state that drives refetches,
//! and `encoding` derives everything a map surface needs to draw a record.

pub mod coordinator;
pub mod encoding;
pub mod feed;
pub mod model;
pub mod prelude;
pub mod telemetry;

pub use prelude::{ClientError, FetchError, FetchResult, FilterError};

//! Data access: query construction, transport and GeoJSON normalization.

pub mod client;
pub mod geojson;
pub mod query;
pub mod transport;

pub use client::{Clock, FeedClient, USGS_QUERY_ENDPOINT};
pub use geojson::{normalize, parse_feature_collection, Feature, FeatureCollection};
pub use query::{FeedQuery, TimeWindow};
pub use transport::{FeedResponse, FeedTransport, ReqwestTransport};

pub mod metrics;

pub use metrics::{FetchMetrics, MetricsSnapshot};

/// Failure of a single feed fetch.
///
/// The coordinator collapses both variants into one user-facing message; the
/// variant itself is only kept for diagnostics.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("malformed feed body: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn status(code: u16) -> Self {
        FetchError::Transport {
            status: Some(code),
            message: format!("feed responded with HTTP {code}"),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        FetchError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Parse(_) => "parse",
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Rejected filter values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("minimum magnitude {0} outside [2.0, 8.0]")]
    MagnitudeOutOfRange(f64),
    #[error("minimum magnitude {0} is not a multiple of 0.5")]
    MagnitudeOffStep(f64),
    #[error("unsupported lookback of {0} days (expected 1, 7 or 30)")]
    UnsupportedLookback(u32),
}

/// Failure to construct a production feed client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid feed endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("building HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

pub use crate::coordinator::{Coordinator, FetchOutcome, FetchTicket, LoadStatus};
pub use crate::feed::{FeedClient, FeedTransport};
pub use crate::model::{EarthquakeRecord, FilterConfiguration, LookbackDays};

pub mod filter;
pub mod record;

pub use filter::{FilterConfiguration, LookbackDays, MAX_MAGNITUDE, MAGNITUDE_STEP, MIN_MAGNITUDE};
pub use record::EarthquakeRecord;

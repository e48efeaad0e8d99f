use crate::prelude::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_MAGNITUDE: f64 = 2.0;
pub const MAX_MAGNITUDE: f64 = 8.0;
pub const MAGNITUDE_STEP: f64 = 0.5;

/// Lookback windows offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LookbackDays {
    Day,
    Week,
    Month,
}

impl LookbackDays {
    pub const ALL: [LookbackDays; 3] = [LookbackDays::Day, LookbackDays::Week, LookbackDays::Month];

    pub fn days(self) -> u32 {
        match self {
            LookbackDays::Day => 1,
            LookbackDays::Week => 7,
            LookbackDays::Month => 30,
        }
    }
}

impl TryFrom<u32> for LookbackDays {
    type Error = FilterError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(LookbackDays::Day),
            7 => Ok(LookbackDays::Week),
            30 => Ok(LookbackDays::Month),
            other => Err(FilterError::UnsupportedLookback(other)),
        }
    }
}

impl From<LookbackDays> for u32 {
    fn from(value: LookbackDays) -> Self {
        value.days()
    }
}

impl fmt::Display for LookbackDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookbackDays::Day => write!(f, "Last 24 hours"),
            LookbackDays::Week => write!(f, "Last 7 days"),
            LookbackDays::Month => write!(f, "Last 30 days"),
        }
    }
}

/// The user-editable query filter. Replaced wholesale on every edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfiguration {
    min_magnitude: f64,
    days: LookbackDays,
}

impl FilterConfiguration {
    pub fn new(min_magnitude: f64, days: LookbackDays) -> Result<Self, FilterError> {
        if !(MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(&min_magnitude) {
            return Err(FilterError::MagnitudeOutOfRange(min_magnitude));
        }
        if (min_magnitude / MAGNITUDE_STEP).fract() != 0.0 {
            return Err(FilterError::MagnitudeOffStep(min_magnitude));
        }
        Ok(Self {
            min_magnitude,
            days,
        })
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    pub fn days(&self) -> LookbackDays {
        self.days
    }

    /// Returns a copy with a new threshold snapped onto the slider grid.
    pub fn with_min_magnitude(self, value: f64) -> Self {
        if value.is_nan() {
            return self;
        }
        let snapped = (value / MAGNITUDE_STEP).round() * MAGNITUDE_STEP;
        Self {
            min_magnitude: snapped.clamp(MIN_MAGNITUDE, MAX_MAGNITUDE),
            ..self
        }
    }

    pub fn with_days(self, days: LookbackDays) -> Self {
        Self { days, ..self }
    }
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            min_magnitude: 4.5,
            days: LookbackDays::Week,
        }
    }
}

impl fmt::Display for FilterConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{:.1}+ / {}", self.min_magnitude, self.days)
    }
}

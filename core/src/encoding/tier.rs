use std::fmt;

pub const MIN_MARKER_RADIUS: f64 = 4.0;

/// Six severity bands, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MagnitudeTier {
    Micro,
    Minor,
    Light,
    Moderate,
    Strong,
    Major,
}

impl MagnitudeTier {
    pub const ALL: [MagnitudeTier; 6] = [
        MagnitudeTier::Micro,
        MagnitudeTier::Minor,
        MagnitudeTier::Light,
        MagnitudeTier::Moderate,
        MagnitudeTier::Strong,
        MagnitudeTier::Major,
    ];

    /// Highest inclusive threshold wins. Null and NaN fall to `Micro`.
    pub fn from_magnitude(magnitude: Option<f64>) -> Self {
        match magnitude {
            Some(m) if m >= 7.0 => MagnitudeTier::Major,
            Some(m) if m >= 6.0 => MagnitudeTier::Strong,
            Some(m) if m >= 5.0 => MagnitudeTier::Moderate,
            Some(m) if m >= 4.0 => MagnitudeTier::Light,
            Some(m) if m >= 3.0 => MagnitudeTier::Minor,
            _ => MagnitudeTier::Micro,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            MagnitudeTier::Major => "#b91c1c",
            MagnitudeTier::Strong => "#dc2626",
            MagnitudeTier::Moderate => "#f97316",
            MagnitudeTier::Light => "#fbbf24",
            MagnitudeTier::Minor => "#fde047",
            MagnitudeTier::Micro => "#a3e635",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            MagnitudeTier::Major => (0xb9, 0x1c, 0x1c),
            MagnitudeTier::Strong => (0xdc, 0x26, 0x26),
            MagnitudeTier::Moderate => (0xf9, 0x73, 0x16),
            MagnitudeTier::Light => (0xfb, 0xbf, 0x24),
            MagnitudeTier::Minor => (0xfd, 0xe0, 0x47),
            MagnitudeTier::Micro => (0xa3, 0xe6, 0x35),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MagnitudeTier::Major => "7.0+ Major",
            MagnitudeTier::Strong => "6.0-6.9 Strong",
            MagnitudeTier::Moderate => "5.0-5.9 Moderate",
            MagnitudeTier::Light => "4.0-4.9 Light",
            MagnitudeTier::Minor => "3.0-3.9 Minor",
            MagnitudeTier::Micro => "2.0-2.9 Micro",
        }
    }
}

impl fmt::Display for MagnitudeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn color_for_magnitude(magnitude: Option<f64>) -> &'static str {
    MagnitudeTier::from_magnitude(magnitude).hex()
}

/// `max(4, m * 3)`; null magnitudes draw at the minimum radius.
pub fn radius_for_magnitude(magnitude: Option<f64>) -> f64 {
    match magnitude {
        Some(m) => (m * 3.0).max(MIN_MARKER_RADIUS),
        None => MIN_MARKER_RADIUS,
    }
}

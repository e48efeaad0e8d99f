//! Pure view derivations consumed by any rendering surface.

pub mod bounds;
pub mod detail;
pub mod tier;

pub use bounds::{fit_viewport, GeoBounds};
pub use detail::EventDetail;
pub use tier::{color_for_magnitude, radius_for_magnitude, MagnitudeTier, MIN_MARKER_RADIUS};

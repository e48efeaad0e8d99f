use crate::model::EarthquakeRecord;

pub const VIEWPORT_PADDING_DEG: f64 = 2.0;
/// Smallest span a fitted viewport may have; stands in for a max-zoom clamp.
pub const MIN_VIEWPORT_SPAN_DEG: f64 = 10.0;

/// Latitude/longitude box. Does not wrap across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub const WORLD: GeoBounds = GeoBounds {
        south: -90.0,
        west: -180.0,
        north: 90.0,
        east: 180.0,
    };

    pub fn enclosing(records: &[EarthquakeRecord]) -> Option<Self> {
        let (first, rest) = records.split_first()?;
        let seed = GeoBounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(rest.iter().fold(seed, |b, r| GeoBounds {
            south: b.south.min(r.latitude),
            west: b.west.min(r.longitude),
            north: b.north.max(r.latitude),
            east: b.east.max(r.longitude),
        }))
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    pub fn padded(self, degrees: f64) -> Self {
        GeoBounds {
            south: self.south - degrees,
            west: self.west - degrees,
            north: self.north + degrees,
            east: self.east + degrees,
        }
    }

    pub fn with_min_span(self, degrees: f64) -> Self {
        let (lat, lon) = self.center();
        let half_lat = self.lat_span().max(degrees) / 2.0;
        let half_lon = self.lon_span().max(degrees) / 2.0;
        GeoBounds {
            south: lat - half_lat,
            west: lon - half_lon,
            north: lat + half_lat,
            east: lon + half_lon,
        }
    }

    pub fn clamped_to_world(self) -> Self {
        GeoBounds {
            south: self.south.max(Self::WORLD.south),
            west: self.west.max(Self::WORLD.west),
            north: self.north.min(Self::WORLD.north),
            east: self.east.min(Self::WORLD.east),
        }
    }

    /// Equirectangular projection into a `width` x `height` surface, keeping
    /// the aspect ratio and centring the box inside the surface.
    pub fn project(&self, latitude: f64, longitude: f64, width: f32, height: f32) -> (f32, f32) {
        let lon_span = self.lon_span().max(f64::EPSILON);
        let lat_span = self.lat_span().max(f64::EPSILON);
        let scale = (f64::from(width) / lon_span).min(f64::from(height) / lat_span);
        let offset_x = (f64::from(width) - lon_span * scale) / 2.0;
        let offset_y = (f64::from(height) - lat_span * scale) / 2.0;
        let x = offset_x + (longitude - self.west) * scale;
        let y = offset_y + (self.north - latitude) * scale;
        (x as f32, y as f32)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Viewport that encloses every record, or `None` for an empty list so the
/// caller keeps its current view.
pub fn fit_viewport(records: &[EarthquakeRecord]) -> Option<GeoBounds> {
    GeoBounds::enclosing(records).map(|bounds| {
        bounds
            .padded(VIEWPORT_PADDING_DEG)
            .with_min_span(MIN_VIEWPORT_SPAN_DEG)
            .clamped_to_world()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(latitude: f64, longitude: f64) -> EarthquakeRecord {
        EarthquakeRecord {
            id: format!("{latitude},{longitude}"),
            magnitude: Some(4.0),
            place: String::new(),
            occurred_at_millis: 0,
            latitude,
            longitude,
            depth_km: 0.0,
            detail_url: String::new(),
            tsunami_flag: 0,
            significance: 0,
        }
    }

    #[test]
    fn empty_list_keeps_current_view() {
        assert_eq!(fit_viewport(&[]), None);
    }

    #[test]
    fn enclosing_covers_every_record() {
        let records = vec![at(10.0, -20.0), at(-35.0, 140.0), at(60.0, 5.0)];
        let bounds = GeoBounds::enclosing(&records).unwrap();
        assert_eq!(
            bounds,
            GeoBounds {
                south: -35.0,
                west: -20.0,
                north: 60.0,
                east: 140.0
            }
        );
        let fitted = fit_viewport(&records).unwrap();
        assert!(records
            .iter()
            .all(|r| fitted.contains(r.latitude, r.longitude)));
    }

    #[test]
    fn single_record_gets_minimum_span() {
        let fitted = fit_viewport(&[at(35.0, 139.0)]).unwrap();
        assert_eq!(fitted.lat_span(), MIN_VIEWPORT_SPAN_DEG);
        assert_eq!(fitted.lon_span(), MIN_VIEWPORT_SPAN_DEG);
        assert_eq!(fitted.center(), (35.0, 139.0));
    }

    #[test]
    fn fitted_view_never_leaves_the_world() {
        let fitted = fit_viewport(&[at(89.5, 179.5), at(-89.0, -179.0)]).unwrap();
        assert_eq!(fitted, GeoBounds::WORLD);
    }

    #[test]
    fn projection_maps_corners_and_keeps_aspect() {
        let world = GeoBounds::WORLD;
        assert_eq!(world.project(90.0, -180.0, 360.0, 180.0), (0.0, 0.0));
        assert_eq!(world.project(-90.0, 180.0, 360.0, 180.0), (360.0, 180.0));
        // Taller surface: the world box is letterboxed vertically.
        let (x, y) = world.project(90.0, -180.0, 360.0, 280.0);
        assert_eq!((x, y), (0.0, 50.0));
    }
}

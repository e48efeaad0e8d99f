use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Size, Theme,
};
use quakecore::encoding::{radius_for_magnitude, GeoBounds, MagnitudeTier};
use quakecore::model::EarthquakeRecord;

use crate::Message;

const GRATICULE_STEP_DEG: i32 = 30;
const MARKER_OPACITY: f32 = 0.7;

pub fn tier_color(tier: MagnitudeTier) -> Color {
    let (r, g, b) = tier.rgb();
    Color::from_rgb8(r, g, b)
}

#[derive(Debug, Clone)]
struct Marker {
    latitude: f64,
    longitude: f64,
    radius: f32,
    tier: MagnitudeTier,
}

/// Circle-marker map drawn in an equirectangular projection of `viewport`.
#[derive(Debug, Clone)]
pub struct QuakeMap {
    markers: Vec<Marker>,
    viewport: GeoBounds,
    selected: Option<usize>,
}

impl QuakeMap {
    pub fn new(records: &[EarthquakeRecord], viewport: GeoBounds, selected: Option<usize>) -> Self {
        Self {
            markers: records
                .iter()
                .map(|record| Marker {
                    latitude: record.latitude,
                    longitude: record.longitude,
                    radius: radius_for_magnitude(record.magnitude) as f32,
                    tier: MagnitudeTier::from_magnitude(record.magnitude),
                })
                .collect(),
            viewport,
            selected,
        }
    }

    fn project(&self, latitude: f64, longitude: f64, size: Size) -> Point {
        let (x, y) = self
            .viewport
            .project(latitude, longitude, size.width, size.height);
        Point::new(x, y)
    }

    /// Topmost visible marker whose circle contains `point`. Later markers
    /// are drawn over earlier ones, so the search runs back to front.
    pub fn marker_at(&self, point: Point, size: Size) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, m)| self.viewport.contains(m.latitude, m.longitude))
            .find(|(_, m)| self.project(m.latitude, m.longitude, size).distance(point) <= m.radius)
            .map(|(index, _)| index)
    }
}

impl canvas::Program<Message> for QuakeMap {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let index = self.marker_at(position, bounds.size())?;
                Some(canvas::Action::publish(Message::SelectEvent(index)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.09, 0.16),
        );

        let view = self.viewport;
        let size = bounds.size();
        let graticule = Path::new(|builder| {
            for lat in (-90..=90).step_by(GRATICULE_STEP_DEG as usize) {
                let lat = f64::from(lat);
                if lat < view.south || lat > view.north {
                    continue;
                }
                builder.move_to(self.project(lat, view.west, size));
                builder.line_to(self.project(lat, view.east, size));
            }
            for lon in (-180..=180).step_by(GRATICULE_STEP_DEG as usize) {
                let lon = f64::from(lon);
                if lon < view.west || lon > view.east {
                    continue;
                }
                builder.move_to(self.project(view.north, lon, size));
                builder.line_to(self.project(view.south, lon, size));
            }
        });
        frame.stroke(
            &graticule,
            Stroke::default()
                .with_color(Color::from_rgb(0.2, 0.26, 0.36))
                .with_width(1.0),
        );

        for (index, marker) in self.markers.iter().enumerate() {
            if !view.contains(marker.latitude, marker.longitude) {
                continue;
            }
            let center = self.project(marker.latitude, marker.longitude, size);
            let circle = Path::circle(center, marker.radius);
            let fill = Color {
                a: MARKER_OPACITY,
                ..tier_color(marker.tier)
            };
            frame.fill(&circle, fill);
            frame.stroke(
                &circle,
                Stroke::default().with_color(Color::WHITE).with_width(1.0),
            );

            if self.selected == Some(index) {
                let ring = Path::circle(center, marker.radius + 4.0);
                frame.stroke(
                    &ring,
                    Stroke::default()
                        .with_color(Color::from_rgb(0.18, 0.72, 0.89))
                        .with_width(2.5),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}

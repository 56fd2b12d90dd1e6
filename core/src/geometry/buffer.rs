use crate::geodata::LngLat;
use crate::prelude::{GeoError, GeoResult};
use geo::{Coord, Destination, Haversine, Intersects, LineString, Point, Polygon, Rect};

const MIN_BUFFER_STEPS: usize = 8;

/// Closed ring approximating a great-circle buffer around one port, with its
/// bounding rectangle cached for candidate pruning.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferPolygon {
    polygon: Polygon<f64>,
    rect: Rect<f64>,
}

impl BufferPolygon {
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn bounding_rect(&self) -> &Rect<f64> {
        &self.rect
    }

    /// Boundary-inclusive containment test. `Intersects` is used instead of
    /// `Contains` so a point sitting exactly on the ring still counts.
    pub fn contains(&self, point: LngLat) -> bool {
        self.polygon.intersects(&Point::new(point.lng, point.lat))
    }
}

/// Builds a buffer ring whose vertices all sit `radius_km` from `center`
/// along great circles, using the haversine model on the mean earth radius.
/// Rings that cross the antimeridian or enclose a pole degenerate in lng/lat
/// space, same as the spherical buffers of the upstream data pipeline.
pub fn geodesic_buffer(center: LngLat, radius_km: f64, steps: usize) -> GeoResult<BufferPolygon> {
    center.validate()?;
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }

    let steps = steps.max(MIN_BUFFER_STEPS);
    let origin = Point::new(center.lng, center.lat);
    let distance_m = radius_km * 1000.0;

    let mut coords = Vec::with_capacity(steps + 1);
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for step in 0..steps {
        let bearing = step as f64 * 360.0 / steps as f64;
        let vertex = Haversine.destination(origin, bearing, distance_m);
        min_x = min_x.min(vertex.x());
        min_y = min_y.min(vertex.y());
        max_x = max_x.max(vertex.x());
        max_y = max_y.max(vertex.y());
        coords.push(Coord {
            x: vertex.x(),
            y: vertex.y(),
        });
    }
    coords.push(coords[0]);

    Ok(BufferPolygon {
        polygon: Polygon::new(LineString::from(coords), Vec::new()),
        rect: Rect::new(
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: max_y },
        ),
    })
}

//! Geographic geometry and the circle generator.
//!
//! Positions are `[longitude, latitude]` in degrees, matching GeoJSON and
//! TopoJSON order. [`Geometry::Sphere`] stands for the whole globe outline.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use crate::consts::CIRCLE_PRECISION_DEG;

/// `[longitude, latitude]` in degrees.
pub type Position = [f64; 2];

/// A ring or line: consecutive positions.
pub type Line = Vec<Position>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// The full globe outline.
    Sphere,
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Line),
    MultiLineString(Vec<Line>),
    /// Outer ring followed by holes.
    Polygon(Vec<Line>),
    MultiPolygon(Vec<Vec<Line>>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Whether the geometry holds no positions at all. The sphere is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sphere | Self::Point(_) => false,
            Self::MultiPoint(points) | Self::LineString(points) => points.is_empty(),
            Self::MultiLineString(lines) | Self::Polygon(lines) => lines.iter().all(Vec::is_empty),
            Self::MultiPolygon(polygons) => polygons.iter().flatten().all(Vec::is_empty),
            Self::Collection(items) => items.iter().all(Geometry::is_empty),
        }
    }
}

/// A closed ring of points `angle` degrees away from `origin`.
#[must_use]
pub fn circle(origin: Position, angle: f64) -> Geometry {
    circle_with_precision(origin, angle, CIRCLE_PRECISION_DEG)
}

/// Like [`circle`], with an explicit angular step between vertices.
#[must_use]
pub fn circle_with_precision(origin: Position, angle: f64, precision: f64) -> Geometry {
    let step = if precision.is_finite() && precision > 0.0 { precision } else { CIRCLE_PRECISION_DEG };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (360.0 / step).ceil().max(3.0) as usize;

    let lat1 = origin[1].to_radians();
    let lon1 = origin[0].to_radians();
    let (sin_a, cos_a) = angle.to_radians().sin_cos();
    let (sin_lat1, cos_lat1) = lat1.sin_cos();

    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        #[allow(clippy::cast_precision_loss)]
        let bearing = (360.0 * i as f64 / steps as f64).to_radians();
        let sin_lat2 = (sin_lat1 * cos_a + cos_lat1 * sin_a * bearing.cos()).clamp(-1.0, 1.0);
        let lat2 = sin_lat2.asin();
        let lon2 = lon1 + (bearing.sin() * sin_a * cos_lat1).atan2(cos_a - sin_lat1 * sin_lat2);
        ring.push([crate::projection::wrap_longitude(lon2.to_degrees()), lat2.to_degrees()]);
    }
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    Geometry::Polygon(vec![ring])
}

//! Path rendering: projects [`Geometry`] into path commands on a [`Surface`].
//!
//! The path only appends to the current path. Callers own `begin_path`,
//! styling, and the final `fill`/`stroke`, so one geometry can be filled and
//! stroked with a single traversal.
//!
//! CLIPPING
//! ========
//! Lines are cut at the horizon: a segment leaving the visible hemisphere
//! ends on the limb, and the pen lifts until the line comes back. Polygon
//! rings are kept closed for filling, so vertices behind the horizon are
//! pulled onto the limb instead. Rings with no visible vertex are skipped.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use std::f64::consts::TAU;

use crate::error::PlanetError;
use crate::geo::{Geometry, Position};
use crate::projection::Projection;
use crate::surface::Surface;

/// Radius in surface pixels used for point geometries.
const POINT_RADIUS: f64 = 4.5;

/// Draws geometry through a projection.
#[derive(Debug, Clone, Copy)]
pub struct GeoPath<'a> {
    projection: &'a Projection,
}

impl<'a> GeoPath<'a> {
    #[must_use]
    pub fn new(projection: &'a Projection) -> Self {
        Self { projection }
    }

    /// Append the projected outline of `geometry` to the surface's current path.
    ///
    /// # Errors
    ///
    /// Propagates [`PlanetError::Surface`] from arc calls.
    pub fn draw(&self, surface: &mut dyn Surface, geometry: &Geometry) -> Result<(), PlanetError> {
        match geometry {
            Geometry::Sphere => self.sphere(surface),
            Geometry::Point(p) => self.point(surface, *p),
            Geometry::MultiPoint(points) => points.iter().try_for_each(|p| self.point(surface, *p)),
            Geometry::LineString(line) => {
                self.line(surface, line);
                Ok(())
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.line(surface, line);
                }
                Ok(())
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    self.ring(surface, ring);
                }
                Ok(())
            }
            Geometry::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.ring(surface, ring);
                }
                Ok(())
            }
            Geometry::Collection(items) => items.iter().try_for_each(|g| self.draw(surface, g)),
        }
    }

    fn sphere(&self, surface: &mut dyn Surface) -> Result<(), PlanetError> {
        let c = self.projection.translate;
        let r = self.projection.scale;
        surface.move_to(c.x + r, c.y);
        surface.arc(c.x, c.y, r, 0.0, TAU)?;
        surface.close_path();
        Ok(())
    }

    fn point(&self, surface: &mut dyn Surface, position: Position) -> Result<(), PlanetError> {
        let Some(p) = self.projection.project(position[0], position[1]) else {
            return Ok(());
        };
        surface.move_to(p.x + POINT_RADIUS, p.y);
        surface.arc(p.x, p.y, POINT_RADIUS, 0.0, TAU)
    }

    fn line(&self, surface: &mut dyn Surface, line: &[Position]) {
        let mut prev: Option<[f64; 3]> = None;
        for position in line {
            let v = self.projection.rotate(position[0], position[1]);
            let visible = Projection::is_visible(v);
            match prev {
                None => {
                    if visible {
                        self.move_to(surface, v);
                    }
                }
                Some(p) => match (Projection::is_visible(p), visible) {
                    (true, true) => self.line_to(surface, v),
                    (true, false) => self.line_to(surface, horizon_crossing(p, v)),
                    (false, true) => {
                        self.move_to(surface, horizon_crossing(p, v));
                        self.line_to(surface, v);
                    }
                    (false, false) => {}
                },
            }
            prev = Some(v);
        }
    }

    fn ring(&self, surface: &mut dyn Surface, ring: &[Position]) {
        let rotated: Vec<[f64; 3]> = ring.iter().map(|p| self.projection.rotate(p[0], p[1])).collect();
        if !rotated.iter().copied().any(Projection::is_visible) {
            return;
        }

        let mut started = false;
        let mut prev: Option<[f64; 3]> = None;
        for &v in &rotated {
            if let Some(p) = prev {
                if Projection::is_visible(p) != Projection::is_visible(v) {
                    self.pen(surface, &mut started, horizon_crossing(p, v));
                }
            }
            if Projection::is_visible(v) {
                self.pen(surface, &mut started, v);
            } else if let Some(limb) = onto_limb(v) {
                self.pen(surface, &mut started, limb);
            }
            prev = Some(v);
        }
        if started {
            surface.close_path();
        }
    }

    fn pen(&self, surface: &mut dyn Surface, started: &mut bool, v: [f64; 3]) {
        if *started {
            self.line_to(surface, v);
        } else {
            self.move_to(surface, v);
            *started = true;
        }
    }

    fn move_to(&self, surface: &mut dyn Surface, v: [f64; 3]) {
        let p = self.projection.place(v);
        surface.move_to(p.x, p.y);
    }

    fn line_to(&self, surface: &mut dyn Surface, v: [f64; 3]) {
        let p = self.projection.place(v);
        surface.line_to(p.x, p.y);
    }
}

/// Point where segment `a`→`b` crosses the horizon plane, pushed onto the unit sphere.
fn horizon_crossing(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let denom = a[0] - b[0];
    if denom.abs() < f64::EPSILON {
        return onto_limb(a).unwrap_or(a);
    }
    let t = a[0] / denom;
    let crossing = [0.0, a[1] + t * (b[1] - a[1]), a[2] + t * (b[2] - a[2])];
    onto_limb(crossing).unwrap_or(a)
}

/// Radial projection of a vector onto the limb circle; `None` for points straight behind the centre.
fn onto_limb(v: [f64; 3]) -> Option<[f64; 3]> {
    let norm = v[1].hypot(v[2]);
    (norm > 1e-12).then(|| [0.0, v[1] / norm, v[2] / norm])
}

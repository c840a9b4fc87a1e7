//! Orthographic projection state.
//!
//! `rotation` and `scale` are the mutable projection state: interaction
//! plugins write them, draw hooks read them. `translate` places the globe
//! centre on the surface and defaults to the surface centre once the planet
//! is created.
//!
//! Rotation follows the usual globe convention: the longitude angle spins the
//! sphere about its polar axis, then the latitude angle tilts it toward or
//! away from the viewer. Points are carried as unit vectors after rotation;
//! the x component points at the viewer, so `x >= 0` means visible.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use crate::consts::{CLIP_ANGLE_DEG, DEFAULT_SCALE};

/// A point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Globe rotation in degrees.
///
/// Invariants after [`Rotation::normalized`]: `latitude` in `[-90, 90]`,
/// `longitude` in `[-180, 180)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub longitude: f64,
    pub latitude: f64,
}

impl Rotation {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Clamp latitude at the poles and wrap longitude.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            longitude: wrap_longitude(self.longitude),
            latitude: self.latitude.clamp(-90.0, 90.0),
        }
    }
}

/// Wrap a longitude into `[-180, 180)` without changing the direction it names.
///
/// A value in `[180, 540)` comes back as `value - 360`.
#[must_use]
pub fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Orthographic projection with a 90° horizon clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub rotation: Rotation,
    /// Globe radius in surface pixels.
    pub scale: f64,
    /// Surface position of the globe centre.
    pub translate: Point,
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic()
    }
}

impl Projection {
    /// Unrotated orthographic projection with the default scale, centred on a 960×500 surface.
    #[must_use]
    pub fn orthographic() -> Self {
        Self { rotation: Rotation::default(), scale: DEFAULT_SCALE, translate: Point::new(480.0, 250.0) }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation.normalized();
        self
    }

    #[must_use]
    pub fn with_translate(mut self, translate: Point) -> Self {
        self.translate = translate;
        self
    }

    /// Rotate a geographic coordinate (degrees) into the view frame.
    ///
    /// Returns a unit vector `[depth, right, up]`; `depth >= 0` faces the viewer.
    #[must_use]
    pub fn rotate(&self, longitude: f64, latitude: f64) -> [f64; 3] {
        let lambda = (longitude + self.rotation.longitude).to_radians();
        let phi = latitude.to_radians();
        let (sin_dphi, cos_dphi) = self.rotation.latitude.to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();

        [x * cos_dphi - z * sin_dphi, y, z * cos_dphi + x * sin_dphi]
    }

    /// Whether a rotated vector lies on the visible hemisphere.
    #[must_use]
    pub fn is_visible(v: [f64; 3]) -> bool {
        v[0] >= CLIP_ANGLE_DEG.to_radians().cos() - 1e-12
    }

    /// Surface position of a rotated vector, ignoring visibility.
    #[must_use]
    pub fn place(&self, v: [f64; 3]) -> Point {
        Point {
            x: self.translate.x + self.scale * v[1],
            y: self.translate.y - self.scale * v[2],
        }
    }

    /// Project a geographic coordinate, or `None` when it is behind the horizon.
    #[must_use]
    pub fn project(&self, longitude: f64, latitude: f64) -> Option<Point> {
        let v = self.rotate(longitude, latitude);
        Self::is_visible(v).then(|| self.place(v))
    }
}

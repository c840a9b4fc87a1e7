//! Zoom and drag plugins.
//!
//! Both bind a gesture handler during init. Handlers are the only code that
//! writes the projection; draw hooks only read it. Optional callbacks see
//! the projection as it was before each update.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use serde::Deserialize;
use tracing::debug;

use crate::config::lenient;
use crate::consts::{DEFAULT_SCALE_EXTENT, DRAG_RANGE_DEG};
use crate::input::Gesture;
use crate::planet::PlanetCore;
use crate::plugins::Plugin;
use crate::projection::{Projection, Rotation};

/// Callback invoked with the projection at a gesture boundary or update.
pub type ProjectionCallback = Box<dyn FnMut(&Projection)>;

fn fire(callback: &mut Option<ProjectionCallback>, projection: &Projection) {
    if let Some(callback) = callback.as_mut() {
        callback(projection);
    }
}

// =============================================================
// Scales
// =============================================================

/// Maps a continuous domain onto a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Map `value` from the domain into the range. Unclamped.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }
}

/// Inclusive `[min, max]` bounds on the projection scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleExtent {
    fn default() -> Self {
        let [min, max] = DEFAULT_SCALE_EXTENT;
        Self { min, max }
    }
}

impl ScaleExtent {
    /// Use `[min, max]` if it is a usable extent, else the default.
    #[must_use]
    pub fn from_pair(pair: Option<[f64; 2]>) -> Self {
        match pair {
            Some([min, max]) if min.is_finite() && max.is_finite() && min > 0.0 && min <= max => Self { min, max },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

// =============================================================
// Zoom
// =============================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    #[serde(deserialize_with = "lenient")]
    pub initial_scale: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub scale_extent: Option<[f64; 2]>,
}

/// Scales the projection on zoom gestures, within an extent.
pub struct Zoom {
    config: ZoomConfig,
    on_start: Option<ProjectionCallback>,
    on_zoom: Option<ProjectionCallback>,
    on_end: Option<ProjectionCallback>,
}

impl Zoom {
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        Self { config, on_start: None, on_zoom: None, on_end: None }
    }

    #[must_use]
    pub fn on_zoom_start(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_zoom(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_zoom = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_zoom_end(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }
}

impl Plugin for Zoom {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let Self { config, mut on_start, mut on_zoom, mut on_end } = *self;
        let extent = ScaleExtent::from_pair(config.scale_extent);

        planet.on_init(move |core| {
            let initial = config.initial_scale.filter(|s| s.is_finite() && *s > 0.0);
            let mut scale = extent.clamp(initial.unwrap_or(core.projection.scale));
            debug!(planet = %core.id, scale, min = extent.min, max = extent.max, "zoom bound");

            core.bind_gestures(move |gesture, projection| match *gesture {
                Gesture::ZoomStart => fire(&mut on_start, projection),
                Gesture::Zoom { factor } => {
                    if !factor.is_finite() || factor <= 0.0 {
                        return;
                    }
                    fire(&mut on_zoom, projection);
                    scale = extent.clamp(scale * factor);
                    projection.scale = scale;
                }
                Gesture::ZoomEnd => fire(&mut on_end, projection),
                _ => {}
            });
            Ok(())
        });
    }
}

// =============================================================
// Drag
// =============================================================

/// Rotation after dragging `(dx, dy)` pixels across a globe of radius `scale`.
///
/// One radius of movement turns the globe [`DRAG_RANGE_DEG`] degrees.
#[must_use]
pub fn drag_rotation(rotation: Rotation, scale: f64, dx: f64, dy: f64) -> Rotation {
    let degrees = LinearScale::new([-scale, scale], [-DRAG_RANGE_DEG, DRAG_RANGE_DEG]);
    Rotation::new(rotation.longitude + degrees.map(dx), rotation.latitude - degrees.map(dy)).normalized()
}

/// Rotates the projection on drag gestures.
#[derive(Default)]
pub struct Drag {
    on_start: Option<ProjectionCallback>,
    on_drag: Option<ProjectionCallback>,
    on_end: Option<ProjectionCallback>,
}

impl Drag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_drag_start(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_drag(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_drag = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_drag_end(mut self, callback: impl FnMut(&Projection) + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }
}

impl Plugin for Drag {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let Self { mut on_start, mut on_drag, mut on_end } = *self;

        planet.on_init(move |core| {
            core.bind_gestures(move |gesture, projection| match *gesture {
                Gesture::DragStart => fire(&mut on_start, projection),
                Gesture::Drag { dx, dy } => {
                    if !dx.is_finite() || !dy.is_finite() {
                        return;
                    }
                    fire(&mut on_drag, projection);
                    projection.rotation = drag_rotation(projection.rotation, projection.scale, dx, dy);
                }
                Gesture::DragEnd => fire(&mut on_end, projection),
                _ => {}
            });
            Ok(())
        });
    }
}

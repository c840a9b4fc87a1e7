//! Browser canvas as a drawing surface.
//!
//! Only compiled with the `web` feature. The host owns the frame clock: it
//! calls [`crate::Planet::start`] once and [`crate::Planet::frame`] from
//! `requestAnimationFrame`, stamping each frame with [`crate::clock::now`].
//! Worlds must be preloaded; there is no file to read.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::PlanetError;
use crate::surface::Surface;

fn js_error(e: &JsValue) -> PlanetError {
    PlanetError::Surface(format!("{e:?}"))
}

/// The canvas's 2D context.
///
/// # Errors
///
/// Returns [`PlanetError::Surface`] if the canvas has no 2D context.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, PlanetError> {
    canvas
        .get_context("2d")
        .map_err(|e| js_error(&e))?
        .ok_or_else(|| PlanetError::Surface("canvas has no 2d context".to_owned()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| js_error(&e))
}

impl Surface for CanvasRenderingContext2d {
    fn width(&self) -> f64 {
        self.canvas().map_or(0.0, |c| f64::from(c.width()))
    }

    fn height(&self) -> f64 {
        self.canvas().map_or(0.0, |c| f64::from(c.height()))
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn clear(&mut self) {
        let (w, h) = (Surface::width(self), Surface::height(self));
        self.clear_rect(0.0, 0.0, w, h);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), PlanetError> {
        CanvasRenderingContext2d::arc(self, x, y, radius, start, end).map_err(|e| js_error(&e))
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.set_fill_style_str(style);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.set_stroke_style_str(style);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }
}

//! Drawing surfaces and the saved-context guard.
//!
//! [`Surface`] is the subset of a 2D canvas context the globe needs. Content
//! plugins never touch a surface directly; they draw inside
//! [`with_saved_context`], which saves the surface state first and restores
//! it when the scope ends, however it ends. Fill, stroke, and line width set
//! by one plugin therefore never leak into the next.
//!
//! [`RecordingSurface`] is the headless implementation. It records every
//! path and paint command along with the style in effect, and keeps a real
//! save/restore stack so style leaks are observable in tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::ops::{Deref, DerefMut};

use crate::error::PlanetError;

/// A 2D drawing target with canvas-style state.
pub trait Surface {
    /// Width in surface pixels.
    fn width(&self) -> f64;
    /// Height in surface pixels.
    fn height(&self) -> f64;

    /// Push the current style/transform state.
    fn save(&mut self);
    /// Pop the most recently saved state. A restore with nothing saved is ignored.
    fn restore(&mut self);
    /// Clear every pixel.
    fn clear(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);

    /// Add a circular arc to the current path. Angles are in radians.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::Surface`] if the backend rejects the arc
    /// (for example a negative radius).
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), PlanetError>;

    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
}

// =============================================================
// Saved context
// =============================================================

/// RAII guard: saves the surface on creation, restores it on drop.
pub struct SavedContext<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> SavedContext<'a> {
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<'a> Deref for SavedContext<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl DerefMut for SavedContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}

impl Drop for SavedContext<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Run `draw` between a save and a guaranteed restore.
///
/// The restore happens on normal return, on an `Err` return, and while
/// unwinding from a panic inside `draw`.
pub fn with_saved_context<R>(surface: &mut dyn Surface, draw: impl FnOnce(&mut dyn Surface) -> R) -> R {
    let mut scope = SavedContext::new(surface);
    draw(&mut *scope)
}

// =============================================================
// Recording surface
// =============================================================

/// Style state tracked by [`RecordingSurface`]; mirrors the canvas defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: String,
    pub stroke: String,
    pub line_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: "#000000".to_owned(), stroke: "#000000".to_owned(), line_width: 1.0 }
    }
}

/// One recorded surface command. Paint commands capture the style in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Clear,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Arc { x: f64, y: f64, radius: f64 },
    Fill { style: String },
    Stroke { style: String, line_width: f64 },
}

/// Headless surface that records commands instead of producing pixels.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    style: Style,
    saved: Vec<Style>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, style: Style::default(), saved: Vec::new(), commands: Vec::new() }
    }

    /// Commands recorded since creation or the last [`Self::take_commands`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The style currently in effect.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Number of saves not yet matched by a restore.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.saved.push(self.style.clone());
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(style) = self.saved.pop() {
            self.style = style;
            self.commands.push(DrawCommand::Restore);
        }
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) -> Result<(), PlanetError> {
        if radius < 0.0 {
            return Err(PlanetError::Surface(format!("negative arc radius {radius}")));
        }
        self.commands.push(DrawCommand::Arc { x, y, radius });
        Ok(())
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill { style: self.style.fill.clone() });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            style: self.style.stroke.clone(),
            line_width: self.style.line_width,
        });
    }

    fn set_fill_style(&mut self, style: &str) {
        style.clone_into(&mut self.style.fill);
    }

    fn set_stroke_style(&mut self, style: &str) {
        style.clone_into(&mut self.style.stroke);
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.style.line_width = width;
        }
    }
}

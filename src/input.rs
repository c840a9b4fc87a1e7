//! Input model: pointer events, gestures, and the tracker between them.
//!
//! Hosts feed raw [`PointerInput`] into a [`PointerTracker`], which keeps the
//! active gesture between pointer-down and pointer-up (or between wheel
//! events) and emits [`Gesture`]s for the interaction plugins. Hosts that
//! already recognise gestures themselves can skip the tracker and send
//! gestures directly.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::clock::Instant;
use crate::consts::{WHEEL_IDLE, WHEEL_LINE_PX, WHEEL_ZOOM_RATE};
use crate::projection::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Raw pointer input in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { at: Point, button: Button },
    Move { at: Point },
    Up { at: Point, button: Button },
    /// Vertical wheel delta, positive = down (zoom out).
    Wheel {
        dy: f64,
        /// The delta is in lines rather than pixels.
        line_mode: bool,
    },
}

/// A recognised zoom or drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    ZoomStart,
    /// Multiply the current scale by `factor`.
    Zoom { factor: f64 },
    ZoomEnd,
    DragStart,
    /// Pointer movement since the previous drag event, in surface pixels.
    Drag { dx: f64, dy: f64 },
    DragEnd,
}

/// Anything a host can send to a running planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerInput),
    Gesture(Gesture),
}

impl From<PointerInput> for InputEvent {
    fn from(input: PointerInput) -> Self {
        Self::Pointer(input)
    }
}

impl From<Gesture> for InputEvent {
    fn from(gesture: Gesture) -> Self {
        Self::Gesture(gesture)
    }
}

/// Gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrackerState {
    /// Waiting for the next pointer-down or wheel event.
    #[default]
    Idle,
    /// Primary button held.
    Dragging {
        /// Position of the previous pointer event, used to compute the delta.
        last: Point,
    },
    /// Wheel zoom active until the wheel goes quiet.
    Zooming {
        /// Time of the latest wheel event.
        last_wheel: Instant,
    },
}

/// Turns pointer input into gestures.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    state: TrackerState,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Feed one pointer event received at `now`.
    pub fn handle(&mut self, input: PointerInput, now: Instant) -> Vec<Gesture> {
        match (input, self.state) {
            (PointerInput::Down { at, button: Button::Primary }, TrackerState::Idle) => {
                self.state = TrackerState::Dragging { last: at };
                vec![Gesture::DragStart]
            }
            (PointerInput::Down { at, button: Button::Primary }, TrackerState::Zooming { .. }) => {
                self.state = TrackerState::Dragging { last: at };
                vec![Gesture::ZoomEnd, Gesture::DragStart]
            }
            (PointerInput::Move { at }, TrackerState::Dragging { last }) => {
                self.state = TrackerState::Dragging { last: at };
                vec![Gesture::Drag { dx: at.x - last.x, dy: at.y - last.y }]
            }
            (PointerInput::Up { button: Button::Primary, .. }, TrackerState::Dragging { .. }) => {
                self.state = TrackerState::Idle;
                vec![Gesture::DragEnd]
            }
            (PointerInput::Wheel { dy, line_mode }, TrackerState::Idle) => {
                self.state = TrackerState::Zooming { last_wheel: now };
                vec![Gesture::ZoomStart, Gesture::Zoom { factor: wheel_factor(dy, line_mode) }]
            }
            (PointerInput::Wheel { dy, line_mode }, TrackerState::Zooming { .. }) => {
                self.state = TrackerState::Zooming { last_wheel: now };
                vec![Gesture::Zoom { factor: wheel_factor(dy, line_mode) }]
            }
            _ => Vec::new(),
        }
    }

    /// End a wheel zoom that has been idle long enough.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        match self.state {
            TrackerState::Zooming { last_wheel } if now.saturating_duration_since(last_wheel) >= WHEEL_IDLE => {
                self.state = TrackerState::Idle;
                Some(Gesture::ZoomEnd)
            }
            _ => None,
        }
    }
}

/// Scale factor for one wheel event: `2^(-dy * rate)`.
#[must_use]
pub fn wheel_factor(dy: f64, line_mode: bool) -> f64 {
    let pixels = if line_mode { dy * WHEEL_LINE_PX } else { dy };
    if !pixels.is_finite() {
        return 1.0;
    }
    (-pixels * WHEEL_ZOOM_RATE).exp2()
}

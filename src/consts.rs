//! Shared defaults for the planetary crate.

use std::time::Duration;

// ── Projection ──────────────────────────────────────────────────

/// Starting projection scale (globe radius in surface pixels).
pub const DEFAULT_SCALE: f64 = 150.0;

/// Horizon clip angle for the orthographic projection, in degrees.
pub const CLIP_ANGLE_DEG: f64 = 90.0;

// ── Draw loop ───────────────────────────────────────────────────

/// Default frame interval, roughly one display refresh.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

// ── Interaction ─────────────────────────────────────────────────

/// Default zoom extent `[min, max]`.
pub const DEFAULT_SCALE_EXTENT: [f64; 2] = [50.0, 2000.0];

/// Wheel zoom sensitivity: each pixel of wheel delta scales by `2^(-0.002)`.
pub const WHEEL_ZOOM_RATE: f64 = 0.002;

/// Pixels per wheel "line" when the browser reports line-mode deltas.
pub const WHEEL_LINE_PX: f64 = 120.0;

/// Idle time after the last wheel event before the zoom gesture ends.
pub const WHEEL_IDLE: Duration = Duration::from_millis(250);

/// Degrees of rotation reached by dragging across one globe radius.
pub const DRAG_RANGE_DEG: f64 = 90.0;

// ── Pings ───────────────────────────────────────────────────────

pub const DEFAULT_PING_COLOR: &str = "white";
pub const DEFAULT_PING_TTL: Duration = Duration::from_millis(2000);
pub const DEFAULT_PING_ANGLE_DEG: f64 = 5.0;

// ── Content ─────────────────────────────────────────────────────

pub const DEFAULT_WORLD_FILE: &str = "world-110m.json";
pub const DEFAULT_OCEAN_FILL: &str = "black";
pub const DEFAULT_LAND_FILL: &str = "white";
pub const DEFAULT_BORDER_STROKE: &str = "gray";

/// Angular step in degrees between generated circle vertices.
pub const CIRCLE_PRECISION_DEG: f64 = 6.0;

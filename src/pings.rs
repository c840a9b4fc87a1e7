//! Ping animator: transient circle markers that fade out and expire.
//!
//! Each ping grows from its coordinate to its full angular radius while its
//! stroke fades from opaque to transparent over its ttl. Expiry is checked
//! once per frame; nothing schedules per-ping timers.

#[cfg(test)]
#[path = "pings_test.rs"]
mod pings_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::clock::{self, Instant};
use crate::color::Rgb;
use crate::config::lenient;
use crate::consts::{DEFAULT_PING_ANGLE_DEG, DEFAULT_PING_COLOR, DEFAULT_PING_TTL};
use crate::geo::circle;
use crate::planet::PlanetCore;
use crate::plugins::{Plugin, PluginState};

/// Animator-wide defaults. `ttl` is in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PingsConfig {
    #[serde(deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub ttl: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub angle: Option<f64>,
}

/// Per-ping overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingOptions {
    pub color: Option<String>,
    pub ttl: Option<Duration>,
    pub angle: Option<f64>,
}

impl PingOptions {
    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub latitude: f64,
    pub longitude: f64,
    pub color: Rgb,
    pub ttl: Duration,
    pub angle: f64,
    pub created_at: Instant,
}

/// One live ping as it should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingFrame {
    pub latitude: f64,
    pub longitude: f64,
    pub color: Rgb,
    /// Stroke opacity, `1 - elapsed / ttl`.
    pub alpha: f64,
    /// Angular radius in degrees, `angle * elapsed / ttl`.
    pub radius: f64,
}

/// Owns the live pings.
#[derive(Debug, Default)]
pub struct PingAnimator {
    defaults: PingsConfig,
    pings: Vec<Ping>,
}

impl PingAnimator {
    #[must_use]
    pub fn new(defaults: PingsConfig) -> Self {
        Self { defaults, pings: Vec::new() }
    }

    pub fn add_at(&mut self, latitude: f64, longitude: f64, options: &PingOptions, now: Instant) {
        let color = non_empty(options.color.as_deref())
            .or(non_empty(self.defaults.color.as_deref()))
            .unwrap_or(DEFAULT_PING_COLOR);
        let ttl = options
            .ttl
            .filter(|ttl| !ttl.is_zero())
            .or_else(|| self.default_ttl())
            .unwrap_or(DEFAULT_PING_TTL);
        let angle = positive(options.angle)
            .or(positive(self.defaults.angle))
            .unwrap_or(DEFAULT_PING_ANGLE_DEG);

        self.pings.push(Ping { latitude, longitude, color: Rgb::parse(color), ttl, angle, created_at: now });
        debug!(latitude, longitude, live = self.pings.len(), "ping added");
    }

    /// Drop expired pings and return the survivors, in insertion order.
    pub fn tick(&mut self, now: Instant) -> Vec<PingFrame> {
        let before = self.pings.len();
        let mut alive = Vec::with_capacity(before);
        let mut frames = Vec::with_capacity(before);
        for ping in self.pings.drain(..) {
            let elapsed = now.saturating_duration_since(ping.created_at);
            if elapsed >= ping.ttl {
                continue;
            }
            let fraction = elapsed.as_secs_f64() / ping.ttl.as_secs_f64();
            frames.push(PingFrame {
                latitude: ping.latitude,
                longitude: ping.longitude,
                color: ping.color,
                alpha: 1.0 - fraction,
                radius: ping.angle * fraction,
            });
            alive.push(ping);
        }
        self.pings = alive;

        let expired = before - self.pings.len();
        if expired > 0 {
            debug!(expired, live = self.pings.len(), "pings expired");
        }
        frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pings.is_empty()
    }

    /// Configured ttl, or `None` when it is unusable as a `Duration`.
    fn default_ttl(&self) -> Option<Duration> {
        let ms = positive(self.defaults.ttl)?;
        match Duration::try_from_secs_f64(ms / 1000.0) {
            Ok(ttl) => Some(ttl),
            Err(_) => None,
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Cloneable handle to a planet's ping animator.
#[derive(Debug, Clone, Default)]
pub struct PingController {
    animator: Rc<RefCell<PingAnimator>>,
}

impl PingController {
    #[must_use]
    pub fn new(defaults: PingsConfig) -> Self {
        Self { animator: Rc::new(RefCell::new(PingAnimator::new(defaults))) }
    }

    /// Add a ping stamped with [`clock::now`], the clock frames are drawn on.
    pub fn add(&self, latitude: f64, longitude: f64, options: &PingOptions) {
        self.add_at(latitude, longitude, options, clock::now());
    }

    pub fn add_at(&self, latitude: f64, longitude: f64, options: &PingOptions, now: Instant) {
        self.animator.borrow_mut().add_at(latitude, longitude, options, now);
    }

    pub fn tick(&self, now: Instant) -> Vec<PingFrame> {
        self.animator.borrow_mut().tick(now)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.animator.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animator.borrow().is_empty()
    }
}

/// Installs a ping animator and the draw hook that renders it.
pub struct Pings {
    config: PingsConfig,
}

impl Pings {
    #[must_use]
    pub fn new(config: PingsConfig) -> Self {
        Self { config }
    }
}

impl Plugin for Pings {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let controller = PingController::new(self.config);
        planet.plugins.insert(PluginState::Pings(controller.clone()));

        planet.on_draw(move |frame| {
            let live = controller.tick(frame.now);
            frame.with_saved_context(|surface, path| {
                for ping in &live {
                    surface.set_stroke_style(&ping.color.with_alpha(ping.alpha));
                    surface.begin_path();
                    path.draw(surface, &circle([ping.longitude, ping.latitude], ping.radius))?;
                    surface.stroke();
                }
                Ok(())
            })
        });
    }
}

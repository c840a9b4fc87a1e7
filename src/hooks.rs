//! Init and draw hooks.
//!
//! Both lists are append-only and run in registration order. Init hooks run
//! once, behind the init barrier ([`run_init_hooks`]); draw hooks run every
//! frame ([`run_draw_hooks`]) and see a read-only [`Frame`].

#[cfg(test)]
#[path = "hooks_test.rs"]
mod hooks_test;

use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::clock::Instant;
use crate::error::PlanetError;
use crate::path::GeoPath;
use crate::planet::PlanetCore;
use crate::plugins::PluginMap;
use crate::projection::Projection;
use crate::surface::{Surface, with_saved_context};

/// Future returned by an async init hook.
pub type InitFuture<'a> = LocalBoxFuture<'a, Result<(), PlanetError>>;

type SyncInit = Box<dyn FnOnce(&mut PlanetCore) -> Result<(), PlanetError>>;
type AsyncInit = Box<dyn for<'a> FnOnce(&'a mut PlanetCore) -> InitFuture<'a>>;

/// One-shot initialization callback.
pub enum InitHook {
    /// Complete when it returns.
    Sync(SyncInit),
    /// Complete when its future resolves.
    Async(AsyncInit),
}

/// Per-frame drawing callback.
pub type DrawHook = Box<dyn FnMut(&mut Frame<'_>) -> Result<(), PlanetError>>;

/// What a draw hook can see during one frame.
pub struct Frame<'a> {
    pub projection: &'a Projection,
    pub plugins: &'a PluginMap,
    /// Frame timestamp, shared by every hook in the frame.
    pub now: Instant,
    surface: &'a mut dyn Surface,
}

impl<'a> Frame<'a> {
    pub fn new(projection: &'a Projection, plugins: &'a PluginMap, surface: &'a mut dyn Surface, now: Instant) -> Self {
        Self { projection, plugins, now, surface }
    }

    /// Raw surface access. Style changes made here leak into later hooks.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    /// Run `draw` between a save and a restore of the surface state, with a
    /// path bound to this frame's projection.
    ///
    /// # Errors
    ///
    /// Returns whatever `draw` returns. The surface is restored either way.
    pub fn with_saved_context<F>(&mut self, draw: F) -> Result<(), PlanetError>
    where
        F: FnOnce(&mut dyn Surface, &GeoPath<'_>) -> Result<(), PlanetError>,
    {
        let path = GeoPath::new(self.projection);
        with_saved_context(&mut *self.surface, |surface| draw(surface, &path))
    }
}

/// Ordered init and draw hook lists.
#[derive(Default)]
pub struct HookRegistry {
    init: Vec<InitHook>,
    draw: Vec<DrawHook>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init<F>(&mut self, hook: F)
    where
        F: FnOnce(&mut PlanetCore) -> Result<(), PlanetError> + 'static,
    {
        self.init.push(InitHook::Sync(Box::new(hook)));
    }

    pub fn on_init_async<F>(&mut self, hook: F)
    where
        F: for<'a> FnOnce(&'a mut PlanetCore) -> InitFuture<'a> + 'static,
    {
        self.init.push(InitHook::Async(Box::new(hook)));
    }

    pub fn on_draw<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Frame<'_>) -> Result<(), PlanetError> + 'static,
    {
        self.draw.push(Box::new(hook));
    }

    #[must_use]
    pub fn init_len(&self) -> usize {
        self.init.len()
    }

    #[must_use]
    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    /// Remove and return the pending init hooks.
    pub fn take_init(&mut self) -> Vec<InitHook> {
        std::mem::take(&mut self.init)
    }

    pub fn draw_hooks_mut(&mut self) -> &mut [DrawHook] {
        &mut self.draw
    }
}

/// The init barrier: run each hook to completion, in order.
///
/// Async hooks are awaited one at a time, so every hook sees the effects of
/// the hooks registered before it.
///
/// # Errors
///
/// Stops at the first failing hook and returns its error. Later hooks never run.
pub async fn run_init_hooks(hooks: Vec<InitHook>, core: &mut PlanetCore) -> Result<(), PlanetError> {
    for (index, hook) in hooks.into_iter().enumerate() {
        let result = match hook {
            InitHook::Sync(hook) => hook(&mut *core),
            InitHook::Async(hook) => hook(&mut *core).await,
        };
        if let Err(e) = result {
            warn!(planet = %core.id, hook = index, error = %e, "init hook failed");
            return Err(e);
        }
        debug!(planet = %core.id, hook = index, "init hook done");
    }
    Ok(())
}

/// Run every draw hook once, in order.
///
/// With `isolate` unset the frame stops at the first failure. With it set,
/// failures are logged and the remaining hooks still run.
///
/// # Errors
///
/// Returns the first hook error when `isolate` is unset.
pub fn run_draw_hooks(hooks: &mut [DrawHook], frame: &mut Frame<'_>, isolate: bool) -> Result<(), PlanetError> {
    for (index, hook) in hooks.iter_mut().enumerate() {
        if let Err(e) = hook(&mut *frame) {
            if !isolate {
                return Err(e);
            }
            warn!(hook = index, error = %e, "draw hook failed; continuing frame");
        }
    }
    Ok(())
}

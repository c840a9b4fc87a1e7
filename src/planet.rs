//! The engine instance: projection, plugins, hooks, and the draw loop.
//!
//! [`PlanetCore`] holds everything that does not touch the drawing surface,
//! so plugins and tests can work with it directly. [`Planet`] pairs a core
//! with a surface, an input queue, and the loop that drives frames.
//!
//! LIFECYCLE
//! =========
//! Plugins install while the planet is being set up. [`Planet::start`] runs
//! the init barrier once; only after it succeeds do frames run. A failed
//! init is final: the planet never draws.
//!
//! Frames come either from [`Planet::run`] (a tokio interval on the current
//! thread, native targets only) or from a host calling [`Planet::frame`] on
//! its own clock, such as a browser's `requestAnimationFrame` passing
//! [`crate::clock::now`].

#[cfg(test)]
#[path = "planet_test.rs"]
mod planet_test;

#[cfg(not(target_arch = "wasm32"))]
use std::future::Future;
use std::rc::Rc;

use tokio::sync::{Notify, mpsc};
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::Instant;
use crate::config::LoopConfig;
use crate::error::PlanetError;
use crate::hooks::{Frame, HookRegistry, InitFuture, run_draw_hooks, run_init_hooks};
use crate::input::{Gesture, InputEvent, PointerTracker};
use crate::pings::PingController;
use crate::plugins::{Plugin, PluginMap, PluginRegistry};
use crate::projection::{Point, Projection};
use crate::surface::Surface;

/// Pending input events a planet buffers between frames.
const INPUT_QUEUE_CAPACITY: usize = 256;

/// Gesture handler bound by an interaction plugin.
pub type GestureHandler = Box<dyn FnMut(&Gesture, &mut Projection)>;

// =============================================================
// Core
// =============================================================

/// Engine state minus the drawing surface.
pub struct PlanetCore {
    /// Unique per instance; appears in log fields.
    pub id: Uuid,
    pub projection: Projection,
    pub plugins: PluginMap,
    hooks: HookRegistry,
    gestures: Vec<GestureHandler>,
}

impl PlanetCore {
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        Self {
            id: Uuid::new_v4(),
            projection,
            plugins: PluginMap::new(),
            hooks: HookRegistry::new(),
            gestures: Vec::new(),
        }
    }

    pub fn load_plugin(&mut self, plugin: Box<dyn Plugin>) {
        plugin.install(self);
        debug!(
            planet = %self.id,
            init_hooks = self.hooks.init_len(),
            draw_hooks = self.hooks.draw_len(),
            "plugin installed"
        );
    }

    pub fn on_init<F>(&mut self, hook: F)
    where
        F: FnOnce(&mut PlanetCore) -> Result<(), PlanetError> + 'static,
    {
        self.hooks.on_init(hook);
    }

    pub fn on_init_async<F>(&mut self, hook: F)
    where
        F: for<'a> FnOnce(&'a mut PlanetCore) -> InitFuture<'a> + 'static,
    {
        self.hooks.on_init_async(hook);
    }

    pub fn on_draw<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Frame<'_>) -> Result<(), PlanetError> + 'static,
    {
        self.hooks.on_draw(hook);
    }

    /// Bind a handler that receives every gesture, in binding order.
    pub fn bind_gestures<F>(&mut self, handler: F)
    where
        F: FnMut(&Gesture, &mut Projection) + 'static,
    {
        self.gestures.push(Box::new(handler));
    }

    pub fn apply_gesture(&mut self, gesture: &Gesture) {
        for handler in &mut self.gestures {
            handler(gesture, &mut self.projection);
        }
    }

    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Run the init barrier. Hooks registered by init hooks run in a later round.
    ///
    /// # Errors
    ///
    /// Returns the first init hook error; nothing after it runs.
    pub async fn initialize(&mut self) -> Result<(), PlanetError> {
        loop {
            let hooks = self.hooks.take_init();
            if hooks.is_empty() {
                return Ok(());
            }
            info!(planet = %self.id, hooks = hooks.len(), "init barrier waiting");
            run_init_hooks(hooks, self).await?;
        }
    }

    /// Clear `surface` and run every draw hook once.
    ///
    /// # Errors
    ///
    /// Returns the first hook error unless `isolate` is set.
    pub fn draw(&mut self, surface: &mut dyn Surface, now: Instant, isolate: bool) -> Result<(), PlanetError> {
        let Self { projection, plugins, hooks, .. } = self;
        surface.clear();
        let mut frame = Frame::new(projection, plugins, surface, now);
        run_draw_hooks(hooks.draw_hooks_mut(), &mut frame, isolate)
    }
}

// =============================================================
// Handles
// =============================================================

/// Cloneable sender of input events into a planet.
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: mpsc::Sender<InputEvent>,
}

impl InputHandle {
    /// Queue an event without waiting. Returns `false` if it was dropped.
    pub fn send(&self, event: impl Into<InputEvent>) -> bool {
        match self.tx.try_send(event.into()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(?event, "input queue full; dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(?event, "planet gone; dropping event");
                false
            }
        }
    }
}

/// Ends a running draw loop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    notify: Rc<Notify>,
}

impl StopHandle {
    /// Stop the loop at its next wakeup. A stop sent before the loop starts is kept.
    pub fn stop(&self) {
        self.notify.notify_one();
    }
}

// =============================================================
// Planet
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Created,
    Ready,
    Failed,
}

/// A globe drawn onto a surface.
pub struct Planet<S: Surface> {
    pub core: PlanetCore,
    surface: S,
    config: LoopConfig,
    tracker: PointerTracker,
    input_tx: mpsc::Sender<InputEvent>,
    input_rx: mpsc::Receiver<InputEvent>,
    stop: Rc<Notify>,
    status: Status,
    frames: u64,
}

impl<S: Surface> Planet<S> {
    /// A planet centred on `surface`, with the default projection and loop config.
    pub fn new(surface: S) -> Self {
        let centre = Point::new(surface.width() / 2.0, surface.height() / 2.0);
        let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
        let core = PlanetCore::new(Projection::orthographic().with_translate(centre));
        info!(planet = %core.id, width = surface.width(), height = surface.height(), "planet created");
        Self {
            core,
            surface,
            config: LoopConfig::default(),
            tracker: PointerTracker::new(),
            input_tx,
            input_rx,
            stop: Rc::new(Notify::new()),
            status: Status::Created,
            frames: 0,
        }
    }

    #[must_use]
    pub fn with_loop_config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    // --- Setup ---

    pub fn load_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.core.load_plugin(plugin);
    }

    /// Build a plugin by name and install it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::UnknownPlugin`] if `registry` has no such plugin.
    pub fn load_named(
        &mut self,
        registry: &PluginRegistry,
        name: &str,
        config: &serde_json::Value,
    ) -> Result<(), PlanetError> {
        let plugin = registry.build(name, config)?;
        self.core.load_plugin(plugin);
        Ok(())
    }

    pub fn on_init<F>(&mut self, hook: F)
    where
        F: FnOnce(&mut PlanetCore) -> Result<(), PlanetError> + 'static,
    {
        self.core.on_init(hook);
    }

    pub fn on_init_async<F>(&mut self, hook: F)
    where
        F: for<'a> FnOnce(&'a mut PlanetCore) -> InitFuture<'a> + 'static,
    {
        self.core.on_init_async(hook);
    }

    pub fn on_draw<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Frame<'_>) -> Result<(), PlanetError> + 'static,
    {
        self.core.on_draw(hook);
    }

    // --- Accessors ---

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.core.id
    }

    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.core.projection
    }

    /// The ping animator, if the pings plugin is installed.
    #[must_use]
    pub fn pings(&self) -> Option<PingController> {
        self.core.plugins.pings()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }

    #[must_use]
    pub fn input_handle(&self) -> InputHandle {
        InputHandle { tx: self.input_tx.clone() }
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { notify: Rc::clone(&self.stop) }
    }

    // --- Input ---

    /// Apply one input event received at `now`.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Pointer(input) => {
                for gesture in self.tracker.handle(input, now) {
                    self.core.apply_gesture(&gesture);
                }
            }
            InputEvent::Gesture(gesture) => self.core.apply_gesture(&gesture),
        }
    }

    fn drain_input(&mut self, now: Instant) {
        while let Ok(event) = self.input_rx.try_recv() {
            self.handle_input(event, now);
        }
        if let Some(gesture) = self.tracker.poll(now) {
            self.core.apply_gesture(&gesture);
        }
    }

    // --- Lifecycle ---

    /// Run the init barrier. Later calls return the first call's outcome.
    ///
    /// # Errors
    ///
    /// Returns the init hook error the first time, then [`PlanetError::InitFailed`].
    pub async fn start(&mut self) -> Result<(), PlanetError> {
        match self.status {
            Status::Ready => return Ok(()),
            Status::Failed => return Err(PlanetError::InitFailed),
            Status::Created => {}
        }
        match self.core.initialize().await {
            Ok(()) => {
                self.status = Status::Ready;
                info!(planet = %self.core.id, draw_hooks = self.core.hooks.draw_len(), "init barrier open");
                Ok(())
            }
            Err(e) => {
                self.status = Status::Failed;
                error!(planet = %self.core.id, error = %e, "init aborted; planet will not draw");
                Err(e)
            }
        }
    }

    /// Draw one frame: apply queued input, poll for idle gestures, clear, run draw hooks.
    ///
    /// # Errors
    ///
    /// [`PlanetError::NotStarted`] before [`Planet::start`] succeeds,
    /// [`PlanetError::InitFailed`] after it failed, otherwise the first draw
    /// hook error unless hooks are isolated.
    pub fn frame(&mut self, now: Instant) -> Result<(), PlanetError> {
        match self.status {
            Status::Created => return Err(PlanetError::NotStarted),
            Status::Failed => return Err(PlanetError::InitFailed),
            Status::Ready => {}
        }
        self.drain_input(now);
        self.frames += 1;
        self.core.draw(&mut self.surface, now, self.config.isolate_hooks)
    }

    /// Start, then draw frames until stopped through a [`StopHandle`].
    ///
    /// # Errors
    ///
    /// Returns the init error if the barrier fails. Frame errors are logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn run(&mut self) -> Result<(), PlanetError> {
        self.run_until(std::future::pending()).await
    }

    /// Start, then draw frames until `shutdown` resolves or a [`StopHandle`] fires.
    ///
    /// # Errors
    ///
    /// Returns the init error if the barrier fails. Frame errors are logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), PlanetError>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;

        let stop = Rc::clone(&self.stop);
        let mut ticker = tokio::time::interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(planet = %self.core.id, frame_interval = ?self.config.frame_interval, "draw loop started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                () = stop.notified() => break,
                maybe_event = self.input_rx.recv() => {
                    if let Some(event) = maybe_event {
                        self.handle_input(event, crate::clock::now());
                    }
                }
                tick = ticker.tick() => {
                    if let Err(e) = self.frame(tick.into_std()) {
                        error!(planet = %self.core.id, frame = self.frames, error = %e, "frame abandoned");
                    }
                }
            }
        }
        info!(planet = %self.core.id, frames = self.frames, "draw loop stopped");
        Ok(())
    }
}

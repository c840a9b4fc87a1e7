//! Plugin contract, typed plugin state, and the plugin registry.
//!
//! A plugin is a value built from its configuration. Installing it onto a
//! [`PlanetCore`] performs all of its registration as a side effect: init hooks,
//! draw hooks, gesture bindings, and entries in the planet's [`PluginMap`].
//!
//! Plugin state that other code needs to reach lives in the [`PluginMap`],
//! keyed by [`PluginId`], one typed variant per capability. State that only
//! the plugin itself needs stays captured inside its hooks.
//!
//! [`PluginRegistry`] maps plugin names to factories that take JSON config.
//! Each caller builds its own registry; nothing is global.

#[cfg(test)]
#[path = "plugins_test.rs"]
mod plugins_test;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::config::from_json;
use crate::content::{Borders, Earth, Land, Oceans, Topojson};
use crate::error::PlanetError;
use crate::interaction::{Drag, Zoom};
use crate::pings::{PingController, Pings};
use crate::planet::PlanetCore;
use crate::topology::Topology;

/// Installs itself onto a planet.
pub trait Plugin {
    /// Register hooks, gesture bindings, and plugin state on `planet`.
    fn install(self: Box<Self>, planet: &mut PlanetCore);
}

// =============================================================
// Plugin state
// =============================================================

/// Keys of the plugin state map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginId {
    Topology,
    Pings,
}

/// World data published by the topology loader.
#[derive(Debug, Clone)]
pub struct TopologyState {
    pub world: Rc<Topology>,
}

#[derive(Debug, Clone)]
pub enum PluginState {
    Topology(TopologyState),
    Pings(PingController),
}

impl PluginState {
    #[must_use]
    pub fn id(&self) -> PluginId {
        match self {
            Self::Topology(_) => PluginId::Topology,
            Self::Pings(_) => PluginId::Pings,
        }
    }
}

/// Per-planet plugin state, one entry per [`PluginId`].
#[derive(Debug, Default)]
pub struct PluginMap {
    entries: HashMap<PluginId, PluginState>,
}

impl PluginMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` under its id, returning whatever it replaced.
    pub fn insert(&mut self, state: PluginState) -> Option<PluginState> {
        self.entries.insert(state.id(), state)
    }

    #[must_use]
    pub fn get(&self, id: PluginId) -> Option<&PluginState> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: PluginId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The loaded world.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::MissingPlugin`] until the topology loader has run.
    pub fn world(&self) -> Result<Rc<Topology>, PlanetError> {
        match self.entries.get(&PluginId::Topology) {
            Some(PluginState::Topology(state)) => Ok(Rc::clone(&state.world)),
            _ => Err(PlanetError::MissingPlugin(PluginId::Topology)),
        }
    }

    /// Handle to the ping animator, if the pings plugin is installed.
    #[must_use]
    pub fn pings(&self) -> Option<PingController> {
        match self.entries.get(&PluginId::Pings) {
            Some(PluginState::Pings(controller)) => Some(controller.clone()),
            _ => None,
        }
    }
}

// =============================================================
// Registry
// =============================================================

type Factory = Box<dyn Fn(&serde_json::Value) -> Box<dyn Plugin>>;

/// Named plugin factories.
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, Factory>,
}

impl PluginRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every plugin this crate ships.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("topojson", |c| Box::new(Topojson::new(from_json(c))));
        registry.register("oceans", |c| Box::new(Oceans::new(from_json(c))));
        registry.register("land", |c| Box::new(Land::new(from_json(c))));
        registry.register("borders", |c| Box::new(Borders::new(from_json(c))));
        registry.register("earth", |c| Box::new(Earth::new(from_json(c))));
        registry.register("pings", |c| Box::new(Pings::new(from_json(c))));
        registry.register("zoom", |c| Box::new(Zoom::new(from_json(c))));
        registry.register("drag", |_| Box::new(Drag::new()));
        registry
    }

    /// Add or replace a factory.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&serde_json::Value) -> Box<dyn Plugin> + 'static,
    {
        self.factories.insert(name.to_owned(), Box::new(factory));
    }

    /// Build the named plugin from its JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::UnknownPlugin`] if no factory has that name.
    pub fn build(&self, name: &str, config: &serde_json::Value) -> Result<Box<dyn Plugin>, PlanetError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PlanetError::UnknownPlugin(name.to_owned()))?;
        debug!(plugin = name, "plugin built from registry");
        Ok(factory(config))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

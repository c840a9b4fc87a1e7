//! Content plugins: the topology loader and the layers drawn from it.
//!
//! [`Earth`] installs [`Topojson`], [`Oceans`], [`Land`], and [`Borders`] in
//! that order, so each frame paints oceans first and borders last. Land and
//! borders derive their shapes once, during init, from the world the loader
//! published; each of their draw hooks paints inside a single saved context.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::lenient;
use crate::consts::{DEFAULT_BORDER_STROKE, DEFAULT_LAND_FILL, DEFAULT_OCEAN_FILL, DEFAULT_WORLD_FILE};
use crate::error::PlanetError;
use crate::geo::Geometry;
use crate::planet::PlanetCore;
use crate::plugins::{Plugin, PluginState, TopologyState};
use crate::topology::{self, TopoObject, Topology};

/// Shape derived during init, read by the draw hook.
type Derived = Rc<RefCell<Option<Geometry>>>;

// =============================================================
// Topology loader
// =============================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TopojsonConfig {
    /// World file to load when no `world` is given.
    #[serde(deserialize_with = "lenient")]
    pub file: Option<String>,
    /// A preloaded world, used instead of reading `file`.
    #[serde(deserialize_with = "lenient")]
    pub world: Option<Topology>,
}

/// Publishes the world in the plugin map during init.
pub struct Topojson {
    file: String,
    world: Option<Rc<Topology>>,
}

impl Topojson {
    #[must_use]
    pub fn new(config: TopojsonConfig) -> Self {
        Self {
            file: config.file.filter(|f| !f.is_empty()).unwrap_or_else(|| DEFAULT_WORLD_FILE.to_owned()),
            world: config.world.map(Rc::new),
        }
    }

    /// Use an already-parsed world; no file is read.
    #[must_use]
    pub fn with_world(mut self, world: Rc<Topology>) -> Self {
        self.world = Some(world);
        self
    }
}

impl Plugin for Topojson {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let Self { file, world } = *self;
        planet.on_init_async(move |core| {
            Box::pin(async move {
                let world = match world {
                    Some(world) => world,
                    None => Rc::new(topology::load(&file).await?),
                };
                core.plugins.insert(PluginState::Topology(TopologyState { world }));
                debug!(planet = %core.id, "world published");
                Ok::<(), PlanetError>(())
            })
        });
    }
}

// =============================================================
// Oceans
// =============================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OceansConfig {
    #[serde(deserialize_with = "lenient")]
    pub fill: Option<String>,
}

/// Fills the globe's outline.
pub struct Oceans {
    fill: String,
}

impl Oceans {
    #[must_use]
    pub fn new(config: OceansConfig) -> Self {
        Self { fill: config.fill.filter(|f| !f.is_empty()).unwrap_or_else(|| DEFAULT_OCEAN_FILL.to_owned()) }
    }
}

impl Plugin for Oceans {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let fill = self.fill;
        planet.on_draw(move |frame| {
            frame.with_saved_context(|surface, path| {
                surface.begin_path();
                path.draw(surface, &Geometry::Sphere)?;
                surface.set_fill_style(&fill);
                surface.fill();
                Ok(())
            })
        });
    }
}

// =============================================================
// Land
// =============================================================

/// `fill` accepts a color or `false`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FillSetting {
    Enabled(bool),
    Color(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LandConfig {
    #[serde(deserialize_with = "lenient")]
    pub fill: Option<FillSetting>,
    #[serde(deserialize_with = "lenient")]
    pub stroke: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub line_width: Option<f64>,
}

/// Fills, and optionally strokes, the world's `land` object.
pub struct Land {
    fill: Option<String>,
    stroke: Option<String>,
    line_width: Option<f64>,
}

impl Land {
    #[must_use]
    pub fn new(config: LandConfig) -> Self {
        let fill = match config.fill {
            Some(FillSetting::Enabled(false)) => None,
            Some(FillSetting::Color(color)) if !color.is_empty() => Some(color),
            _ => Some(DEFAULT_LAND_FILL.to_owned()),
        };
        Self { fill, stroke: config.stroke.filter(|s| !s.is_empty()), line_width: positive(config.line_width) }
    }
}

impl Plugin for Land {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let shape: Derived = Rc::default();

        let slot = Rc::clone(&shape);
        planet.on_init(move |core| {
            let world = core.plugins.world()?;
            let land = world.feature(world.object("land")?)?;
            *slot.borrow_mut() = Some(land);
            Ok(())
        });

        let Self { fill, stroke, line_width } = *self;
        planet.on_draw(move |frame| {
            let shape = shape.borrow();
            let Some(land) = shape.as_ref() else {
                return Ok(());
            };
            frame.with_saved_context(|surface, path| {
                surface.begin_path();
                path.draw(surface, land)?;
                if let Some(fill) = &fill {
                    surface.set_fill_style(fill);
                    surface.fill();
                }
                if let Some(stroke) = &stroke {
                    if let Some(width) = line_width {
                        surface.set_line_width(width);
                    }
                    surface.set_stroke_style(stroke);
                    surface.stroke();
                }
                Ok(())
            })
        });
    }
}

// =============================================================
// Borders
// =============================================================

/// Which country boundaries to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    /// Boundaries shared by two different countries.
    #[default]
    Internal,
    /// Coastlines: boundaries used by a single country.
    External,
    Both,
}

impl BorderKind {
    /// Mesh filter over the first and last countries using an arc.
    #[must_use]
    pub fn accepts(self, a: &TopoObject, b: &TopoObject) -> bool {
        match self {
            Self::Internal => a.id != b.id,
            Self::External => a.id == b.id,
            Self::Both => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BordersConfig {
    #[serde(deserialize_with = "lenient")]
    pub stroke: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub line_width: Option<f64>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: BorderKind,
}

/// Strokes the mesh of the world's `countries` object.
pub struct Borders {
    stroke: String,
    line_width: Option<f64>,
    kind: BorderKind,
}

impl Borders {
    #[must_use]
    pub fn new(config: BordersConfig) -> Self {
        Self {
            stroke: config.stroke.filter(|s| !s.is_empty()).unwrap_or_else(|| DEFAULT_BORDER_STROKE.to_owned()),
            line_width: positive(config.line_width),
            kind: config.kind,
        }
    }
}

impl Plugin for Borders {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let shape: Derived = Rc::default();
        let Self { stroke, line_width, kind } = *self;

        let slot = Rc::clone(&shape);
        planet.on_init(move |core| {
            let world = core.plugins.world()?;
            let borders = world.mesh(world.object("countries")?, |a, b| kind.accepts(a, b))?;
            *slot.borrow_mut() = Some(borders);
            Ok(())
        });

        planet.on_draw(move |frame| {
            let shape = shape.borrow();
            let Some(borders) = shape.as_ref() else {
                return Ok(());
            };
            frame.with_saved_context(|surface, path| {
                surface.begin_path();
                path.draw(surface, borders)?;
                surface.set_stroke_style(&stroke);
                if let Some(width) = line_width {
                    surface.set_line_width(width);
                }
                surface.stroke();
                Ok(())
            })
        });
    }
}

// =============================================================
// Earth
// =============================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EarthConfig {
    #[serde(deserialize_with = "lenient")]
    pub topojson: TopojsonConfig,
    #[serde(deserialize_with = "lenient")]
    pub oceans: OceansConfig,
    #[serde(deserialize_with = "lenient")]
    pub land: LandConfig,
    #[serde(deserialize_with = "lenient")]
    pub borders: BordersConfig,
}

/// Topology loader, oceans, land, and borders, installed in that order.
pub struct Earth {
    topojson: Topojson,
    oceans: Oceans,
    land: Land,
    borders: Borders,
}

impl Earth {
    #[must_use]
    pub fn new(config: EarthConfig) -> Self {
        Self {
            topojson: Topojson::new(config.topojson),
            oceans: Oceans::new(config.oceans),
            land: Land::new(config.land),
            borders: Borders::new(config.borders),
        }
    }

    /// Use an already-parsed world; no file is read.
    #[must_use]
    pub fn with_world(mut self, world: Rc<Topology>) -> Self {
        self.topojson = self.topojson.with_world(world);
        self
    }
}

impl Plugin for Earth {
    fn install(self: Box<Self>, planet: &mut PlanetCore) {
        let Self { topojson, oceans, land, borders } = *self;
        planet.load_plugin(Box::new(topojson));
        planet.load_plugin(Box::new(oceans));
        planet.load_plugin(Box::new(land));
        planet.load_plugin(Box::new(borders));
        info!(planet = %planet.id, "earth installed");
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

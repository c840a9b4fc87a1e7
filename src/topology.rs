//! TopoJSON world data.
//!
//! The world document is parsed once during init and then shared read-only.
//! Content plugins derive their shapes from it with [`Topology::feature`]
//! (filled areas such as land) and [`Topology::mesh`] (shared boundary
//! lines such as country borders).
//!
//! Arcs may be quantized: with a `transform`, arc positions are integer
//! deltas from the previous position and are scaled and translated on
//! decode. Point coordinates are absolute and only scaled.

#[cfg(test)]
#[path = "topology_test.rs"]
mod topology_test;

use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::error::PlanetError;
use crate::geo::{Geometry, Line, Position};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Position {
        [x * self.scale[0] + self.translate[0], y * self.scale[1] + self.translate[1]]
    }
}

/// A TopoJSON document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub objects: HashMap<String, TopoObject>,
}

/// A named object or a member of a geometry collection.
#[derive(Debug, Clone, Deserialize)]
pub struct TopoObject {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(flatten)]
    pub shape: Shape,
}

/// Arc references are signed: `i` walks arc `i` forward, `!i` walks arc `i` backward.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    GeometryCollection { geometries: Vec<TopoObject> },
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
}

impl Topology {
    /// Parse a TopoJSON document. `path` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::WorldParse`] if the text is not a valid topology.
    pub fn parse(text: &str, path: &str) -> Result<Self, PlanetError> {
        serde_json::from_str(text).map_err(|source| PlanetError::WorldParse { path: path.to_owned(), source })
    }

    /// Look up a named top-level object.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::MissingObject`] if no object has that name.
    pub fn object(&self, name: &str) -> Result<&TopoObject, PlanetError> {
        self.objects.get(name).ok_or_else(|| PlanetError::MissingObject(name.to_owned()))
    }

    /// Convert an object into geometry.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::ArcIndex`] if the object references a missing arc.
    pub fn feature(&self, object: &TopoObject) -> Result<Geometry, PlanetError> {
        Ok(match &object.shape {
            Shape::GeometryCollection { geometries } => Geometry::Collection(
                geometries
                    .iter()
                    .map(|g| self.feature(g))
                    .collect::<Result<_, _>>()?,
            ),
            Shape::Point { coordinates } => Geometry::Point(self.point(coordinates)),
            Shape::MultiPoint { coordinates } => {
                Geometry::MultiPoint(coordinates.iter().map(|c| self.point(c)).collect())
            }
            Shape::LineString { arcs } => Geometry::LineString(self.line(arcs)?),
            Shape::MultiLineString { arcs } => {
                Geometry::MultiLineString(arcs.iter().map(|a| self.line(a)).collect::<Result<_, _>>()?)
            }
            Shape::Polygon { arcs } => Geometry::Polygon(self.rings(arcs)?),
            Shape::MultiPolygon { arcs } => {
                Geometry::MultiPolygon(arcs.iter().map(|p| self.rings(p)).collect::<Result<_, _>>()?)
            }
        })
    }

    /// Lines for every arc of `object` accepted by `filter`.
    ///
    /// Each arc is offered once as `filter(first, last)`, where `first` and
    /// `last` are the first and last geometries referencing it. An arc used by
    /// a single geometry is offered as `filter(g, g)`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::ArcIndex`] if the object references a missing arc.
    pub fn mesh<F>(&self, object: &TopoObject, filter: F) -> Result<Geometry, PlanetError>
    where
        F: Fn(&TopoObject, &TopoObject) -> bool,
    {
        let mut by_arc: Vec<Vec<(i64, &TopoObject)>> = vec![Vec::new(); self.arcs.len()];
        collect_arc_users(object, &mut by_arc)?;

        let mut lines = Vec::new();
        for users in &by_arc {
            let (Some(&(first_ref, first)), Some(&(_, last))) = (users.first(), users.last()) else {
                continue;
            };
            if filter(first, last) {
                lines.push(self.line(&[first_ref])?);
            }
        }
        Ok(Geometry::MultiLineString(lines))
    }

    fn point(&self, coordinates: &[f64]) -> Position {
        let x = coordinates.first().copied().unwrap_or_default();
        let y = coordinates.get(1).copied().unwrap_or_default();
        match &self.transform {
            Some(t) => t.apply(x, y),
            None => [x, y],
        }
    }

    fn decode_arc(&self, reference: i64) -> Result<Line, PlanetError> {
        let index = arc_index(reference);
        let raw = self
            .arcs
            .get(usize::try_from(index).unwrap_or(usize::MAX))
            .ok_or(PlanetError::ArcIndex(reference))?;

        let mut points: Line = Vec::with_capacity(raw.len());
        let (mut x, mut y) = (0.0, 0.0);
        for p in raw {
            let px = p.first().copied().unwrap_or_default();
            let py = p.get(1).copied().unwrap_or_default();
            points.push(match &self.transform {
                Some(t) => {
                    x += px;
                    y += py;
                    t.apply(x, y)
                }
                None => [px, py],
            });
        }
        if reference < 0 {
            points.reverse();
        }
        Ok(points)
    }

    fn line(&self, arcs: &[i64]) -> Result<Line, PlanetError> {
        let mut points: Line = Vec::new();
        for &reference in arcs {
            let arc = self.decode_arc(reference)?;
            let skip = usize::from(!points.is_empty());
            points.extend(arc.into_iter().skip(skip));
        }
        if points.len() == 1 {
            points.push(points[0]);
        }
        Ok(points)
    }

    fn rings(&self, rings: &[Vec<i64>]) -> Result<Vec<Line>, PlanetError> {
        rings
            .iter()
            .map(|arcs| {
                let mut ring = self.line(arcs)?;
                if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
                    if first != last {
                        ring.push(first);
                    }
                }
                Ok(ring)
            })
            .collect()
    }
}

fn arc_index(reference: i64) -> i64 {
    if reference < 0 { !reference } else { reference }
}

fn collect_arc_users<'a>(object: &'a TopoObject, by_arc: &mut [Vec<(i64, &'a TopoObject)>]) -> Result<(), PlanetError> {
    match &object.shape {
        Shape::GeometryCollection { geometries } => {
            for g in geometries {
                collect_arc_users(g, by_arc)?;
            }
        }
        Shape::Point { .. } | Shape::MultiPoint { .. } => {}
        Shape::LineString { arcs } => record_arc_users(arcs.iter(), object, by_arc)?,
        Shape::MultiLineString { arcs } | Shape::Polygon { arcs } => {
            record_arc_users(arcs.iter().flatten(), object, by_arc)?;
        }
        Shape::MultiPolygon { arcs } => record_arc_users(arcs.iter().flatten().flatten(), object, by_arc)?,
    }
    Ok(())
}

fn record_arc_users<'a, 'r>(
    references: impl Iterator<Item = &'r i64>,
    object: &'a TopoObject,
    by_arc: &mut [Vec<(i64, &'a TopoObject)>],
) -> Result<(), PlanetError> {
    for &reference in references {
        let index = usize::try_from(arc_index(reference)).unwrap_or(usize::MAX);
        let slot = by_arc.get_mut(index).ok_or(PlanetError::ArcIndex(reference))?;
        slot.push((reference, object));
    }
    Ok(())
}

/// Read and parse a topology file.
///
/// # Errors
///
/// Returns [`PlanetError::WorldLoad`] if the file cannot be read and
/// [`PlanetError::WorldParse`] if it is not valid TopoJSON. In the browser
/// there is no filesystem, so this always fails with
/// [`PlanetError::WorldLoad`]; pass a preloaded world instead.
pub async fn load(path: &str) -> Result<Topology, PlanetError> {
    let text = read_world(path).await.map_err(|source| PlanetError::WorldLoad { path: path.to_owned(), source })?;
    let topology = Topology::parse(&text, path)?;
    info!(path, arcs = topology.arcs.len(), objects = topology.objects.len(), "world loaded");
    Ok(topology)
}

#[cfg(not(target_arch = "wasm32"))]
async fn read_world(path: &str) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
}

#[cfg(target_arch = "wasm32")]
async fn read_world(_path: &str) -> std::io::Result<String> {
    Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "no filesystem; preload the world"))
}

use std::time::Instant;

use super::*;
use crate::projection::Projection;
use crate::surface::{DrawCommand, RecordingSurface};

const TWO_SQUARES: &str = include_str!("../tests/fixtures/two_squares.json");

fn world() -> Rc<Topology> {
    Rc::new(Topology::parse(TWO_SQUARES, "two_squares.json").unwrap())
}

fn paints(surface: &RecordingSurface) -> Vec<DrawCommand> {
    surface
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Fill { .. } | DrawCommand::Stroke { .. }))
        .cloned()
        .collect()
}

async fn drawn(plugins: Vec<Box<dyn Plugin>>) -> RecordingSurface {
    let mut core = PlanetCore::new(Projection::orthographic());
    for plugin in plugins {
        core.load_plugin(plugin);
    }
    core.initialize().await.unwrap();
    let mut surface = RecordingSurface::new(960.0, 500.0);
    core.draw(&mut surface, Instant::now(), false).unwrap();
    surface
}

fn loader() -> Box<dyn Plugin> {
    Box::new(Topojson::new(TopojsonConfig::default()).with_world(world()))
}

// =============================================================
// Config
// =============================================================

#[test]
fn land_config_accepts_false_or_color() {
    let off: LandConfig = crate::config::from_json(&serde_json::json!({ "fill": false, "lineWidth": 2 }));
    assert_eq!(off.fill, Some(FillSetting::Enabled(false)));
    assert_eq!(off.line_width, Some(2.0));
    assert!(Land::new(off).fill.is_none());

    let green: LandConfig = crate::config::from_json(&serde_json::json!({ "fill": "green" }));
    assert_eq!(Land::new(green).fill.as_deref(), Some("green"));

    assert_eq!(Land::new(LandConfig::default()).fill.as_deref(), Some("white"));
}

#[test]
fn borders_config_reads_type() {
    let config: BordersConfig = crate::config::from_json(&serde_json::json!({ "type": "external" }));
    assert_eq!(config.kind, BorderKind::External);
    let unknown: BordersConfig = crate::config::from_json(&serde_json::json!({ "type": "coastal", "stroke": "red" }));
    assert_eq!(unknown.kind, BorderKind::Internal);
    assert_eq!(unknown.stroke.as_deref(), Some("red"));
}

#[test]
fn earth_config_slices_per_layer() {
    let config: EarthConfig = crate::config::from_json(&serde_json::json!({
        "topojson": { "file": "custom.json" },
        "oceans": { "fill": "navy" },
        "borders": 12,
    }));
    assert_eq!(config.topojson.file.as_deref(), Some("custom.json"));
    assert_eq!(config.oceans.fill.as_deref(), Some("navy"));
    assert_eq!(config.borders, BordersConfig::default());
}

#[test]
fn border_kind_filters() {
    let w = world();
    let Ok(countries) = w.object("countries") else {
        panic!("fixture has countries");
    };
    let crate::topology::Shape::GeometryCollection { geometries } = &countries.shape else {
        panic!("countries is a collection");
    };
    let (a, b) = (&geometries[0], &geometries[1]);
    assert!(BorderKind::Internal.accepts(a, b));
    assert!(!BorderKind::Internal.accepts(a, a));
    assert!(BorderKind::External.accepts(a, a));
    assert!(!BorderKind::External.accepts(a, b));
    assert!(BorderKind::Both.accepts(a, b));
}

// =============================================================
// Drawing
// =============================================================

#[tokio::test]
async fn oceans_fill_sphere_with_default_black() {
    let surface = drawn(vec![Box::new(Oceans::new(OceansConfig::default()))]).await;
    assert_eq!(paints(&surface), vec![DrawCommand::Fill { style: "black".into() }]);
    assert!(surface.commands().iter().any(|c| matches!(c, DrawCommand::Arc { radius, .. } if (*radius - 150.0).abs() < 1e-9)));
    assert_eq!(surface.save_depth(), 0);
}

#[tokio::test]
async fn oceans_empty_fill_uses_default() {
    let config = OceansConfig { fill: Some(String::new()) };
    let surface = drawn(vec![Box::new(Oceans::new(config))]).await;
    assert_eq!(paints(&surface), vec![DrawCommand::Fill { style: "black".into() }]);
}

#[tokio::test]
async fn land_fills_and_strokes_when_configured() {
    let config = LandConfig { fill: None, stroke: Some("green".into()), line_width: Some(2.0) };
    let surface = drawn(vec![loader(), Box::new(Land::new(config))]).await;
    assert_eq!(
        paints(&surface),
        vec![
            DrawCommand::Fill { style: "white".into() },
            DrawCommand::Stroke { style: "green".into(), line_width: 2.0 },
        ]
    );
    assert_eq!(surface.style().line_width, 1.0);
}

#[tokio::test]
async fn borders_stroke_gray_by_default() {
    let surface = drawn(vec![loader(), Box::new(Borders::new(BordersConfig::default()))]).await;
    assert_eq!(paints(&surface), vec![DrawCommand::Stroke { style: "gray".into(), line_width: 1.0 }]);
}

#[tokio::test]
async fn land_without_loader_fails_init() {
    let mut core = PlanetCore::new(Projection::orthographic());
    core.load_plugin(Box::new(Land::new(LandConfig::default())));
    let err = core.initialize().await.unwrap_err();
    assert!(matches!(err, PlanetError::MissingPlugin(crate::plugins::PluginId::Topology)));
}

#[tokio::test]
async fn loader_reads_file_during_init() {
    let config = TopojsonConfig {
        file: Some(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/two_squares.json").into()),
        world: None,
    };
    let mut core = PlanetCore::new(Projection::orthographic());
    core.load_plugin(Box::new(Topojson::new(config)));
    assert!(core.plugins.world().is_err());
    core.initialize().await.unwrap();
    assert_eq!(core.plugins.world().unwrap().arcs.len(), 3);
}

#[tokio::test]
async fn loader_missing_file_is_fatal() {
    let config = TopojsonConfig { file: Some("/nonexistent/world.json".into()), world: None };
    let mut core = PlanetCore::new(Projection::orthographic());
    core.load_plugin(Box::new(Topojson::new(config)));
    assert!(matches!(core.initialize().await, Err(PlanetError::WorldLoad { .. })));
}

#[tokio::test]
async fn loader_empty_file_reads_default_world() {
    let config = TopojsonConfig { file: Some(String::new()), world: None };
    let mut core = PlanetCore::new(Projection::orthographic());
    core.load_plugin(Box::new(Topojson::new(config)));
    match core.initialize().await {
        Err(PlanetError::WorldLoad { path, .. }) => assert_eq!(path, DEFAULT_WORLD_FILE),
        other => panic!("expected default world load failure, got {other:?}"),
    }
}

#[tokio::test]
async fn earth_draws_oceans_then_land_then_borders() {
    let earth = Earth::new(EarthConfig::default()).with_world(world());
    let surface = drawn(vec![Box::new(earth)]).await;
    assert_eq!(
        paints(&surface),
        vec![
            DrawCommand::Fill { style: "black".into() },
            DrawCommand::Fill { style: "white".into() },
            DrawCommand::Stroke { style: "gray".into(), line_width: 1.0 },
        ]
    );
}

//! End-to-end: a planet with the earth, pings, zoom, and drag plugins drawn
//! onto a recording surface.
#![allow(clippy::float_cmp)]

use std::time::{Duration, Instant};

use planetary::PlanetError;
use planetary::input::{Gesture, InputEvent};
use planetary::pings::PingOptions;
use planetary::planet::Planet;
use planetary::plugins::PluginRegistry;
use planetary::surface::{DrawCommand, RecordingSurface};
use serde_json::{Value, json};

const TWO_SQUARES: &str = include_str!("fixtures/two_squares.json");

fn fixture_path() -> String {
    format!("{}/tests/fixtures/two_squares.json", env!("CARGO_MANIFEST_DIR"))
}

fn paints(commands: &[DrawCommand]) -> Vec<DrawCommand> {
    commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Fill { .. } | DrawCommand::Stroke { .. }))
        .cloned()
        .collect()
}

fn globe(earth: &Value) -> Planet<RecordingSurface> {
    let registry = PluginRegistry::with_builtins();
    let mut planet = Planet::new(RecordingSurface::new(960.0, 500.0));
    planet.load_named(&registry, "earth", earth).unwrap();
    planet.load_named(&registry, "pings", &json!({ "color": "red", "ttl": 2000, "angle": 5 })).unwrap();
    planet.load_named(&registry, "zoom", &json!({ "scaleExtent": [100, 400] })).unwrap();
    planet.load_named(&registry, "drag", &Value::Null).unwrap();
    planet
}

#[tokio::test]
async fn earth_paints_layers_in_order_with_pings_on_top() {
    let mut planet = globe(&json!({ "topojson": { "file": fixture_path() } }));
    planet.start().await.unwrap();

    let now = Instant::now();
    let Some(pings) = planet.pings() else {
        panic!("pings plugin installed");
    };
    pings.add_at(1.0, 1.0, &PingOptions::default(), now);
    planet.frame(now + Duration::from_millis(1000)).unwrap();

    assert_eq!(
        paints(planet.surface().commands()),
        vec![
            DrawCommand::Fill { style: "black".into() },
            DrawCommand::Fill { style: "white".into() },
            DrawCommand::Stroke { style: "gray".into(), line_width: 1.0 },
            DrawCommand::Stroke { style: "rgba(255,0,0,0.5)".into(), line_width: 1.0 },
        ]
    );
    assert_eq!(planet.surface().commands().first(), Some(&DrawCommand::Clear));
    assert_eq!(planet.surface().save_depth(), 0);
}

#[tokio::test]
async fn inline_world_needs_no_file() {
    let world: Value = serde_json::from_str(TWO_SQUARES).unwrap();
    let mut planet = globe(&json!({
        "topojson": { "world": world, "file": "/nonexistent.json" },
        "land": { "fill": false, "stroke": "green", "lineWidth": 0.5 },
        "borders": { "type": "both", "stroke": "#888" },
    }));
    planet.start().await.unwrap();
    planet.frame(Instant::now()).unwrap();

    assert_eq!(
        paints(planet.surface().commands()),
        vec![
            DrawCommand::Fill { style: "black".into() },
            DrawCommand::Stroke { style: "green".into(), line_width: 0.5 },
            DrawCommand::Stroke { style: "#888".into(), line_width: 1.0 },
        ]
    );
}

#[tokio::test]
async fn missing_world_file_aborts_before_any_frame() {
    let mut planet = globe(&json!({ "topojson": { "file": "/nonexistent/world-110m.json" } }));
    assert!(matches!(planet.start().await, Err(PlanetError::WorldLoad { .. })));
    assert!(planet.frame(Instant::now()).is_err());
    assert!(planet.surface().commands().is_empty());
    assert_eq!(planet.frames(), 0);
}

#[tokio::test]
async fn pings_expire_after_ttl() {
    let mut planet = globe(&json!({ "topojson": { "file": fixture_path() } }));
    planet.start().await.unwrap();
    let now = Instant::now();
    let Some(pings) = planet.pings() else {
        panic!("pings plugin installed");
    };
    pings.add_at(10.0, 20.0, &PingOptions::default(), now);

    planet.frame(now + Duration::from_millis(1999)).unwrap();
    assert_eq!(pings.len(), 1);
    planet.frame(now + Duration::from_millis(2000)).unwrap();
    assert!(pings.is_empty());
}

#[tokio::test(start_paused = true)]
async fn gestures_sent_while_running_move_the_globe() {
    let world: Value = serde_json::from_str(TWO_SQUARES).unwrap();
    let mut planet = globe(&json!({ "topojson": { "world": world } }));
    let input = planet.input_handle();
    let stop = planet.stop_handle();

    let driver = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        input.send(InputEvent::Gesture(Gesture::ZoomStart));
        input.send(Gesture::Zoom { factor: 2.0 });
        input.send(Gesture::ZoomEnd);
        input.send(Gesture::DragStart);
        input.send(Gesture::Drag { dx: 100.0, dy: -100.0 });
        input.send(Gesture::DragEnd);
        tokio::time::sleep(Duration::from_millis(50)).await;
        stop.stop();
    };
    let (result, ()) = tokio::join!(planet.run(), driver);
    result.unwrap();

    let projection = planet.projection();
    assert_eq!(projection.scale, 300.0);
    assert!((projection.rotation.longitude - 30.0).abs() < 1e-9);
    assert!((projection.rotation.latitude - 30.0).abs() < 1e-9);
    assert!(planet.frames() > 2);
}

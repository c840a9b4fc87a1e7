use super::*;
use crate::projection::Point;
use crate::surface::{DrawCommand, RecordingSurface};

fn projection() -> Projection {
    Projection::orthographic()
        .with_scale(100.0)
        .with_translate(Point::new(200.0, 200.0))
}

fn draw(geometry: &Geometry) -> Vec<DrawCommand> {
    let projection = projection();
    let mut surface = RecordingSurface::new(400.0, 400.0);
    GeoPath::new(&projection).draw(&mut surface, geometry).unwrap();
    surface.take_commands()
}

fn distance_from_centre(x: f64, y: f64) -> f64 {
    (x - 200.0).hypot(y - 200.0)
}

// =============================================================
// Sphere & points
// =============================================================

#[test]
fn sphere_is_a_full_arc_at_scale() {
    let commands = draw(&Geometry::Sphere);
    assert_eq!(
        commands,
        vec![
            DrawCommand::MoveTo(300.0, 200.0),
            DrawCommand::Arc { x: 200.0, y: 200.0, radius: 100.0 },
            DrawCommand::ClosePath,
        ]
    );
}

#[test]
fn visible_point_draws_marker() {
    let commands = draw(&Geometry::Point([0.0, 0.0]));
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[1], DrawCommand::Arc { x, y, .. } if x == 200.0 && y == 200.0));
}

#[test]
fn hidden_point_draws_nothing() {
    assert!(draw(&Geometry::MultiPoint(vec![[180.0, 0.0], [170.0, 5.0]])).is_empty());
}

// =============================================================
// Lines
// =============================================================

#[test]
fn visible_line_is_move_then_lines() {
    let commands = draw(&Geometry::LineString(vec![[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]]));
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], DrawCommand::MoveTo(..)));
    assert!(matches!(commands[1], DrawCommand::LineTo(..)));
    assert!(matches!(commands[2], DrawCommand::LineTo(..)));
}

#[test]
fn line_leaving_view_ends_on_limb() {
    let commands = draw(&Geometry::LineString(vec![[60.0, 0.0], [120.0, 0.0]]));
    assert_eq!(commands.len(), 2);
    let DrawCommand::LineTo(x, y) = commands[1] else {
        panic!("expected line_to, got {:?}", commands[1]);
    };
    assert!((distance_from_centre(x, y) - 100.0).abs() < 1e-6);
}

#[test]
fn line_returning_to_view_starts_on_limb() {
    let commands = draw(&Geometry::LineString(vec![[120.0, 0.0], [150.0, 0.0], [60.0, 0.0]]));
    assert_eq!(commands.len(), 2);
    let DrawCommand::MoveTo(x, y) = commands[0] else {
        panic!("expected move_to, got {:?}", commands[0]);
    };
    assert!((distance_from_centre(x, y) - 100.0).abs() < 1e-6);
}

#[test]
fn hidden_line_draws_nothing() {
    assert!(draw(&Geometry::MultiLineString(vec![vec![[120.0, 0.0], [170.0, 10.0]]])).is_empty());
}

// =============================================================
// Rings
// =============================================================

#[test]
fn visible_ring_is_closed() {
    let square = vec![[-10.0, -10.0], [10.0, -10.0], [10.0, 10.0], [-10.0, 10.0], [-10.0, -10.0]];
    let commands = draw(&Geometry::Polygon(vec![square]));
    assert!(matches!(commands.first(), Some(DrawCommand::MoveTo(..))));
    assert_eq!(commands.last(), Some(&DrawCommand::ClosePath));
}

#[test]
fn hidden_ring_is_skipped() {
    let square = vec![[170.0, -10.0], [-170.0, -10.0], [-170.0, 10.0], [170.0, 10.0], [170.0, -10.0]];
    assert!(draw(&Geometry::MultiPolygon(vec![vec![square]])).is_empty());
}

#[test]
fn partly_hidden_ring_stays_inside_disc() {
    let ring = vec![[60.0, -10.0], [120.0, -10.0], [120.0, 10.0], [60.0, 10.0], [60.0, -10.0]];
    let commands = draw(&Geometry::Polygon(vec![ring]));
    assert_eq!(commands.last(), Some(&DrawCommand::ClosePath));
    for command in &commands {
        if let DrawCommand::MoveTo(x, y) | DrawCommand::LineTo(x, y) = *command {
            assert!(distance_from_centre(x, y) <= 100.0 + 1e-6);
        }
    }
}

#[test]
fn collection_draws_each_member() {
    let commands = draw(&Geometry::Collection(vec![Geometry::Sphere, Geometry::Point([0.0, 0.0])]));
    assert_eq!(commands.len(), 5);
}

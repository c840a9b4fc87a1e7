#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// RecordingSurface
// =============================================================

#[test]
fn recording_surface_starts_with_canvas_defaults() {
    let surface = RecordingSurface::new(960.0, 500.0);
    assert_eq!(surface.width(), 960.0);
    assert_eq!(surface.height(), 500.0);
    assert_eq!(surface.style(), &Style::default());
    assert!(surface.commands().is_empty());
}

#[test]
fn paint_commands_capture_current_style() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    surface.set_fill_style("red");
    surface.fill();
    surface.set_stroke_style("blue");
    surface.set_line_width(3.0);
    surface.stroke();

    assert_eq!(
        surface.commands(),
        &[
            DrawCommand::Fill { style: "red".into() },
            DrawCommand::Stroke { style: "blue".into(), line_width: 3.0 },
        ]
    );
}

#[test]
fn restore_without_save_is_ignored() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    surface.set_fill_style("red");
    surface.restore();
    assert_eq!(surface.style().fill, "red");
    assert!(surface.commands().is_empty());
}

#[test]
fn invalid_line_width_is_ignored() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    surface.set_line_width(0.0);
    surface.set_line_width(f64::NAN);
    assert_eq!(surface.style().line_width, 1.0);
}

#[test]
fn negative_arc_radius_is_an_error() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    assert!(matches!(surface.arc(0.0, 0.0, -1.0, 0.0, 1.0), Err(PlanetError::Surface(_))));
}

#[test]
fn take_commands_drains() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    surface.begin_path();
    assert_eq!(surface.take_commands(), vec![DrawCommand::BeginPath]);
    assert!(surface.commands().is_empty());
}

// =============================================================
// Saved context
// =============================================================

#[test]
fn saved_context_restores_style_on_return() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    with_saved_context(&mut surface, |s| {
        s.set_fill_style("green");
        s.set_line_width(4.0);
    });
    assert_eq!(surface.style(), &Style::default());
    assert_eq!(surface.save_depth(), 0);
    assert_eq!(surface.commands(), &[DrawCommand::Save, DrawCommand::Restore]);
}

#[test]
fn saved_context_restores_style_on_error() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    let result: Result<(), PlanetError> = with_saved_context(&mut surface, |s| {
        s.set_stroke_style("orange");
        s.arc(0.0, 0.0, -5.0, 0.0, 1.0)
    });
    assert!(result.is_err());
    assert_eq!(surface.style().stroke, "#000000");
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn saved_context_restores_style_on_panic() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        with_saved_context(&mut surface, |s| {
            s.set_fill_style("purple");
            if s.width() > 0.0 {
                panic!("draw failed");
            }
        });
    }));
    assert!(outcome.is_err());
    assert_eq!(surface.style().fill, "#000000");
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn nested_scopes_restore_in_order() {
    let mut surface = RecordingSurface::new(10.0, 10.0);
    with_saved_context(&mut surface, |outer| {
        outer.set_fill_style("red");
        with_saved_context(outer, |inner| inner.set_fill_style("blue"));
        outer.fill();
    });
    assert_eq!(surface.commands()[3], DrawCommand::Fill { style: "red".into() });
    assert_eq!(surface.style().fill, "#000000");
}

#[test]
fn guard_derefs_to_surface() {
    let mut surface = RecordingSurface::new(12.0, 8.0);
    {
        let mut scope = SavedContext::new(&mut surface);
        assert_eq!(scope.width(), 12.0);
        scope.begin_path();
    }
    assert_eq!(
        surface.commands(),
        &[DrawCommand::Save, DrawCommand::BeginPath, DrawCommand::Restore]
    );
}

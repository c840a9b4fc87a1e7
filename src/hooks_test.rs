use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::surface::{DrawCommand, RecordingSurface};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn core() -> PlanetCore {
    PlanetCore::new(Projection::orthographic())
}

fn frame_parts() -> (Projection, PluginMap, RecordingSurface) {
    (Projection::orthographic(), PluginMap::new(), RecordingSurface::new(100.0, 100.0))
}

// =============================================================
// Registry
// =============================================================

#[test]
fn registry_counts_hooks() {
    let mut hooks = HookRegistry::new();
    hooks.on_init(|_| Ok(()));
    hooks.on_init_async(|_| Box::pin(async { Ok::<(), PlanetError>(()) }));
    hooks.on_draw(|_| Ok(()));
    assert_eq!(hooks.init_len(), 2);
    assert_eq!(hooks.draw_len(), 1);
    assert_eq!(hooks.take_init().len(), 2);
    assert_eq!(hooks.init_len(), 0);
}

// =============================================================
// Init barrier
// =============================================================

#[tokio::test]
async fn init_hooks_run_in_registration_order() {
    let log: Log = Rc::default();
    let mut hooks = HookRegistry::new();
    let (a, b, c) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
    hooks.on_init(move |_| {
        a.borrow_mut().push("sync-1");
        Ok(())
    });
    hooks.on_init_async(move |_| {
        Box::pin(async move {
            tokio::task::yield_now().await;
            b.borrow_mut().push("async-2");
            Ok::<(), PlanetError>(())
        })
    });
    hooks.on_init(move |_| {
        c.borrow_mut().push("sync-3");
        Ok(())
    });

    let mut core = core();
    run_init_hooks(hooks.take_init(), &mut core).await.unwrap();
    assert_eq!(*log.borrow(), vec!["sync-1", "async-2", "sync-3"]);
}

#[tokio::test]
async fn async_hook_sees_earlier_hook_effects() {
    let mut hooks = HookRegistry::new();
    hooks.on_init(|core| {
        core.projection.scale = 321.0;
        Ok(())
    });
    let seen = Rc::new(RefCell::new(0.0));
    let out = Rc::clone(&seen);
    hooks.on_init_async(move |core| {
        Box::pin(async move {
            *out.borrow_mut() = core.projection.scale;
            Ok::<(), PlanetError>(())
        })
    });
    let mut core = core();
    run_init_hooks(hooks.take_init(), &mut core).await.unwrap();
    assert!((*seen.borrow() - 321.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn init_failure_stops_later_hooks() {
    let log: Log = Rc::default();
    let mut hooks = HookRegistry::new();
    hooks.on_init(|_| Err(PlanetError::MissingObject("land".into())));
    let after = Rc::clone(&log);
    hooks.on_init(move |_| {
        after.borrow_mut().push("ran");
        Ok(())
    });
    let mut core = core();
    let err = run_init_hooks(hooks.take_init(), &mut core).await.unwrap_err();
    assert!(matches!(err, PlanetError::MissingObject(_)));
    assert!(log.borrow().is_empty());
}

// =============================================================
// Draw hooks
// =============================================================

#[test]
fn draw_hooks_run_in_order_with_shared_timestamp() {
    let log: Log = Rc::default();
    let stamps = Rc::new(RefCell::new(Vec::new()));
    let mut hooks = HookRegistry::new();
    for name in ["first", "second", "third"] {
        let (log, stamps) = (Rc::clone(&log), Rc::clone(&stamps));
        hooks.on_draw(move |frame| {
            log.borrow_mut().push(name);
            stamps.borrow_mut().push(frame.now);
            Ok(())
        });
    }
    let (projection, plugins, mut surface) = frame_parts();
    let now = Instant::now();
    let mut frame = Frame::new(&projection, &plugins, &mut surface, now);
    run_draw_hooks(hooks.draw_hooks_mut(), &mut frame, false).unwrap();

    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    assert!(stamps.borrow().iter().all(|t| *t == now));
}

fn failing_middle(log: &Log) -> HookRegistry {
    let mut hooks = HookRegistry::new();
    let a = Rc::clone(log);
    hooks.on_draw(move |_| {
        a.borrow_mut().push("before");
        Ok(())
    });
    hooks.on_draw(|_| Err(PlanetError::Surface("boom".into())));
    let c = Rc::clone(log);
    hooks.on_draw(move |_| {
        c.borrow_mut().push("after");
        Ok(())
    });
    hooks
}

#[test]
fn failing_hook_stops_frame_by_default() {
    let log: Log = Rc::default();
    let mut hooks = failing_middle(&log);
    let (projection, plugins, mut surface) = frame_parts();
    let mut frame = Frame::new(&projection, &plugins, &mut surface, Instant::now());
    assert!(run_draw_hooks(hooks.draw_hooks_mut(), &mut frame, false).is_err());
    assert_eq!(*log.borrow(), vec!["before"]);
}

#[test]
fn isolated_hooks_keep_drawing_after_failure() {
    let log: Log = Rc::default();
    let mut hooks = failing_middle(&log);
    let (projection, plugins, mut surface) = frame_parts();
    let mut frame = Frame::new(&projection, &plugins, &mut surface, Instant::now());
    assert!(run_draw_hooks(hooks.draw_hooks_mut(), &mut frame, true).is_ok());
    assert_eq!(*log.borrow(), vec!["before", "after"]);
}

// =============================================================
// Frame
// =============================================================

#[test]
fn saved_context_restores_after_error() {
    let (projection, plugins, mut surface) = frame_parts();
    let mut frame = Frame::new(&projection, &plugins, &mut surface, Instant::now());
    let result = frame.with_saved_context(|surface, _| {
        surface.set_fill_style("red");
        Err(PlanetError::Surface("late failure".into()))
    });
    assert!(result.is_err());
    assert_eq!(surface.style().fill, "#000000");
    assert_eq!(surface.commands(), &[DrawCommand::Save, DrawCommand::Restore]);
}

#[test]
fn saved_context_path_uses_frame_projection() {
    let projection = Projection::orthographic().with_scale(42.0);
    let plugins = PluginMap::new();
    let mut surface = RecordingSurface::new(100.0, 100.0);
    let mut frame = Frame::new(&projection, &plugins, &mut surface, Instant::now());
    frame
        .with_saved_context(|surface, path| path.draw(surface, &crate::geo::Geometry::Sphere))
        .unwrap();
    assert!(surface.commands().iter().any(|c| matches!(c, DrawCommand::Arc { radius, .. } if (*radius - 42.0).abs() < 1e-9)));
}

//! Interactive globe rendering for 2D drawing surfaces.
//!
//! A [`planet::Planet`] owns a drawing surface, an orthographic projection,
//! and two ordered hook lists. Plugins register init hooks (run once, behind
//! an init barrier) and draw hooks (run every frame, in registration order).
//! Content plugins draw oceans, land, and borders from a TopoJSON world;
//! interaction plugins turn pointer gestures into rotation and zoom; the ping
//! animator draws fading markers that expire on their own.
//!
//! The engine is single-threaded and cooperative. It runs on a current-thread
//! tokio runtime (see [`planet::Planet::run`]) or is driven frame by frame by a
//! host that owns its own clock (see [`planet::Planet::frame`]).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`planet`] | Engine instance, init barrier, draw loop |
//! | [`hooks`] | Init and draw hook registry |
//! | [`surface`] | Drawing surface trait, saved-context guard, recording surface |
//! | [`projection`] | Orthographic projection state and rotation math |
//! | [`geo`] | Geometry types and the circle generator |
//! | [`path`] | Projects geometry into path commands on a surface |
//! | [`topology`] | TopoJSON model, `feature` and `mesh` derivation |
//! | [`input`] | Pointer input, gestures, and the input tracker |
//! | [`interaction`] | Zoom and drag plugins |
//! | [`pings`] | Ping animator plugin |
//! | [`content`] | Topology loader, oceans, land, borders, earth plugins |
//! | [`plugins`] | Plugin trait, typed plugin state, plugin registry |
//! | [`clock`] | Frame clock, native and browser |
//! | [`color`] | CSS color parsing for ping fades |
//! | [`config`] | Draw loop configuration and lenient config parsing |
//! | [`consts`] | Shared defaults |
//! | [`error`] | Crate error type |

pub mod clock;
pub mod color;
pub mod config;
pub mod consts;
pub mod content;
pub mod error;
pub mod geo;
pub mod hooks;
pub mod input;
pub mod interaction;
pub mod path;
pub mod pings;
pub mod planet;
pub mod plugins;
pub mod projection;
pub mod surface;
pub mod topology;
#[cfg(feature = "web")]
pub mod web;

pub use clock::Instant;
pub use error::PlanetError;
pub use planet::Planet;

//! Sprite toolkit: positioned elements, animated motion and polled collision
//! detection inside a bounded game viewport.
//!
//! A [`game::Game`] owns every element and a single virtual clock. Elements
//! move along CSS-style transitions ([`transform`], [`timing`]); a collision
//! observer polls overlapping rectangles once per frame and reports
//! edge-triggered start/end events; a camera can follow one element by
//! scrolling the viewport. Hosts drive the clock with
//! [`game::Game::advance`], or in real time with [`runtime::run_for`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`game`] | Viewport, element lifecycle, moves, collisions, camera, clock |
//! | [`element`] | Element attributes, layout and rect cache |
//! | [`motion`] | Per-axis move state machine and move options |
//! | [`transform`] | Animated value with an in-flight transition |
//! | [`timing`] | Transition durations and easing functions |
//! | [`collision`] | Collision observer and its scene interface |
//! | [`selector`] | Kind/class/name patterns for collision candidates |
//! | [`camera`] | Scroll bounds and follow math |
//! | [`event`] | Event types and per-entity buses |
//! | [`scheduler`] | Virtual-time task queue |
//! | [`registry`] | Named spawn behaviors |
//! | [`config`] | Game configuration and environment overlay |
//! | [`geometry`] | Points, rectangles, intersection |
//! | [`runtime`] | Tokio frame loop |
//! | [`consts`] | Shared defaults |

pub mod camera;
pub mod collision;
pub mod config;
pub mod consts;
pub mod element;
pub mod error;
pub mod event;
pub mod game;
pub mod geometry;
pub mod motion;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod selector;
pub mod timing;
pub mod transform;

pub use config::GameConfig;
pub use element::{ElementConfig, ElementId};
pub use error::GameError;
pub use event::{Control, Event, EventKind};
pub use game::Game;
pub use geometry::{Point, Rect, intersects};
pub use motion::{Axis, AxisRange, Behavior, MoveOptions};
pub use registry::Registry;

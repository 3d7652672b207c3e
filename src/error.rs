//! Crate-level error type.
//!
//! Every variant is a structural misuse: the caller passed something the
//! toolkit cannot act on. No-op conditions (unobserving an unknown element,
//! observing a pattern twice) are reported through boolean returns instead,
//! and canceled moves return `Ok(false)`.

use crate::element::ElementId;
use crate::motion::Axis;
use crate::selector::SelectorError;
use crate::timing::TimingError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// The element id does not belong to this game.
    #[error("element {0} is not attached to this game")]
    UnknownElement(ElementId),
    /// A move request set both `duration` and `speed`.
    #[error("move of element {id} on {axis} sets both duration and speed; only one may be given")]
    ConflictingMoveOptions { id: ElementId, axis: Axis },
    /// Positions and move targets must be finite.
    #[error("element {id} cannot be placed at {value} on {axis}: coordinates must be finite")]
    NonFiniteCoordinate { id: ElementId, axis: Axis, value: f64 },
    /// A min/max pair where min exceeds max.
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },
    /// Frame rate must be a positive finite number.
    #[error("invalid frame rate {0}: must be finite and greater than zero")]
    InvalidFrameRate(f64),
    /// Zoom must be a finite non-negative number.
    #[error("invalid zoom {0}: must be finite and not negative")]
    InvalidZoom(f64),
    /// Collision polling interval must be a positive finite number of ms.
    #[error("invalid collision interval {0}ms: must be finite and greater than zero")]
    InvalidInterval(f64),
    /// A behavior was registered without a name.
    #[error("behavior name must not be empty")]
    UnnamedBehavior,
    /// A behavior name was registered twice.
    #[error("behavior {0:?} is already defined")]
    DuplicateBehavior(String),
    /// An element asked for a behavior that was never registered.
    #[error("behavior {0:?} has not been defined")]
    UnknownBehavior(String),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Timing(#[from] TimingError),
}

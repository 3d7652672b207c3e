//! Per-axis motion state machine.
//!
//! An [`AxisMotion`] is one [`Transform`] plus at most one pending completion
//! handler. The handler is plain data ([`PendingMove`]) rather than a closure:
//! replacing it is an assignment, so a newer move always wins and a replaced
//! handler can never fire.
//!
//! The orchestration (before/after events, scheduling the transition end)
//! lives on the game, which owns the clock and the event buses.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::scheduler::TaskId;
use crate::timing::{TimingError, TimingFunction, TransitionDuration};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

// =============================================================================
// AXIS RANGE
// =============================================================================

/// Inclusive min/max bound on one axis. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisRange {
    pub const UNBOUNDED: Self = Self { min: None, max: None };

    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] when `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, GameError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] when `min > max`.
    pub fn validate(&self) -> Result<(), GameError> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(GameError::InvalidRange { min, max });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.min.unwrap_or(f64::NEG_INFINITY)
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    /// Clamp `value` into the range and floor it to a whole unit.
    #[must_use]
    pub fn bound(&self, value: f64) -> f64 {
        value.min(self.upper()).max(self.lower()).floor()
    }
}

// =============================================================================
// MOVE REQUESTS
// =============================================================================

/// What happens once a move completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    #[default]
    None,
    /// Move back to where the move started.
    Reverse,
    /// Keep going by the same delta from wherever the move ended.
    Repeat,
}

/// Options for a single move. At most one of `duration` and `speed` may be
/// set; zero values count as unset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveOptions {
    pub duration: Option<TransitionDuration>,
    /// Units per second.
    pub speed: Option<f64>,
    pub timing: TimingFunction,
    pub behavior: Behavior,
}

impl MoveOptions {
    #[must_use]
    pub fn with_duration(duration: TransitionDuration) -> Self {
        Self { duration: Some(duration), ..Self::default() }
    }

    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        Self { speed: Some(speed), ..Self::default() }
    }

    #[must_use]
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn given_duration(&self) -> Option<TransitionDuration> {
        self.duration.filter(|d| !d.is_zero())
    }

    fn given_speed(&self) -> Option<f64> {
        self.speed.filter(|s| *s != 0.0 && s.is_finite())
    }

    /// Both a duration and a speed were supplied.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        self.given_duration().is_some() && self.given_speed().is_some()
    }

    /// Transition length for a move covering `delta` units.
    ///
    /// # Errors
    ///
    /// [`TimingError::InvalidDuration`] when the speed is so slow the
    /// transition would outlast [`std::time::Duration::MAX`].
    pub fn effective_duration(&self, delta: f64) -> Result<TransitionDuration, TimingError> {
        match (self.given_duration(), self.given_speed()) {
            (Some(duration), _) => Ok(duration),
            (None, Some(speed)) => TransitionDuration::from_secs_f64(delta.abs() / speed.abs()),
            (None, None) => Ok(TransitionDuration::ZERO),
        }
    }
}

/// Payload of before-move and after-move events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveDetail {
    pub previous: f64,
    pub next: f64,
    pub duration: TransitionDuration,
    pub timing: TimingFunction,
    pub behavior: Behavior,
}

impl MoveDetail {
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.next - self.previous
    }
}

/// Completion handler of an accepted move, run when its transition lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMove {
    pub detail: MoveDetail,
    pub options: MoveOptions,
}

impl PendingMove {
    /// Target of the follow-up move, given the position once this one landed.
    #[must_use]
    pub fn continuation(&self, current: f64) -> Option<f64> {
        match self.detail.behavior {
            Behavior::None => None,
            Behavior::Reverse => Some(self.detail.previous),
            Behavior::Repeat => Some(current + self.detail.delta()),
        }
    }
}

// =============================================================================
// AXIS MOTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionState {
    Idle,
    Transitioning,
}

#[derive(Debug, Clone)]
pub struct AxisMotion {
    transform: Transform,
    pending: Option<PendingMove>,
    /// Scheduled end of the in-flight transition.
    timer: Option<TaskId>,
}

impl AxisMotion {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { transform: Transform::new(value), pending: None, timer: None }
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingMove> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> MotionState {
        if self.transform.is_transitioning() {
            MotionState::Transitioning
        } else {
            MotionState::Idle
        }
    }

    /// Install the completion handler of a new move and adopt its transition
    /// settings. Returns the handler it replaced.
    pub fn begin(&mut self, pending: PendingMove) -> Option<PendingMove> {
        self.transform.set_duration(pending.detail.duration);
        self.transform.set_timing(pending.detail.timing);
        self.pending.replace(pending)
    }

    /// Drop the completion handler and zero the duration.
    pub fn halt(&mut self) -> Option<PendingMove> {
        self.transform.set_duration(TransitionDuration::ZERO);
        self.pending.take()
    }

    pub fn take_pending(&mut self) -> Option<PendingMove> {
        self.pending.take()
    }

    #[must_use]
    pub fn timer(&self) -> Option<TaskId> {
        self.timer
    }

    pub fn replace_timer(&mut self, timer: Option<TaskId>) -> Option<TaskId> {
        std::mem::replace(&mut self.timer, timer)
    }
}

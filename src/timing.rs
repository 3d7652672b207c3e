//! Transition durations and timing functions.
//!
//! Durations follow the CSS convention: a bare number is seconds, and the
//! `s` and `ms` suffixes are accepted. Timing functions map linear progress
//! through a transition onto eased progress, the same curves a browser uses
//! for `transition-timing-function`.

#[cfg(test)]
#[path = "timing_test.rs"]
mod timing_test;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Newton iterations tried before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;
const SOLVE_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingError {
    #[error("invalid duration {0:?}: expected a non-negative number of seconds, optionally suffixed by `s` or `ms`")]
    InvalidDuration(String),
    #[error("unknown timing function {0:?}")]
    UnknownTimingFunction(String),
    #[error("cubic-bezier x coordinates must lie within [0, 1], got {0} and {1}")]
    BezierOutOfRange(f64, f64),
}

// =============================================================================
// DURATION
// =============================================================================

/// Length of one transition. Deserializes from a CSS string or from a bare
/// number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDuration", into = "String")]
pub struct TransitionDuration(Duration);

/// Wire shapes accepted for a duration.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(f64),
    Text(String),
}

impl TransitionDuration {
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Build a duration from a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidDuration`] for negative or non-finite input.
    pub fn from_secs_f64(secs: f64) -> Result<Self, TimingError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(TimingError::InvalidDuration(secs.to_string()));
        }
        Duration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|_| TimingError::InvalidDuration(secs.to_string()))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }

    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for TransitionDuration {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl FromStr for TransitionDuration {
    type Err = TimingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || TimingError::InvalidDuration(raw.to_owned());

        let (number, scale) = if let Some(ms) = trimmed.strip_suffix("ms") {
            (ms, 1000.0)
        } else if let Some(s) = trimmed.strip_suffix('s') {
            (s, 1.0)
        } else {
            (trimmed, 1.0)
        };

        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        Self::from_secs_f64(value / scale).map_err(|_| invalid())
    }
}

impl fmt::Display for TransitionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs_f64())
    }
}

impl TryFrom<RawDuration> for TransitionDuration {
    type Error = TimingError;

    fn try_from(value: RawDuration) -> Result<Self, Self::Error> {
        match value {
            RawDuration::Seconds(secs) => Self::from_secs_f64(secs),
            RawDuration::Text(text) => text.parse(),
        }
    }
}

impl From<TransitionDuration> for String {
    fn from(value: TransitionDuration) -> Self {
        value.to_string()
    }
}

// =============================================================================
// TIMING FUNCTION
// =============================================================================

/// Easing curve applied over the course of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimingFunction {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Jumps to the end value as soon as the transition starts.
    StepStart,
    /// Holds the start value until the transition ends.
    StepEnd,
    /// Cubic Bézier with implicit end points (0,0) and (1,1).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl TimingFunction {
    /// Build a cubic Bézier curve.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::BezierOutOfRange`] if `x1` or `x2` lies outside
    /// `[0, 1]`, which would make the curve non-monotonic in time.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, TimingError> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) || !y1.is_finite() || !y2.is_finite() {
            return Err(TimingError::BezierOutOfRange(x1, x2));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Map linear progress `t` (clamped to `[0, 1]`) onto eased progress.
    #[must_use]
    pub fn progress(self, t: f64) -> f64 {
        let t = t.max(0.0).min(1.0);
        match self {
            Self::Linear => t,
            Self::StepStart => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::StepEnd => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Ease => solve_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => solve_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => solve_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => solve_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => solve_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// One coordinate of a cubic Bézier with end points 0 and 1.
fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * t + b) * t + c) * t
}

fn bezier_axis_slope(p1: f64, p2: f64, t: f64) -> f64 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Find the curve parameter whose x equals `x`, then return its y.
fn solve_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }

    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let error = bezier_axis(x1, x2, t) - x;
        if error.abs() < SOLVE_EPSILON {
            return bezier_axis(y1, y2, t);
        }
        let slope = bezier_axis_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= error / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier_axis(x1, x2, t);
        if (value - x).abs() < SOLVE_EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    bezier_axis(y1, y2, t)
}

impl FromStr for TimingFunction {
    type Err = TimingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            "step-start" => return Ok(Self::StepStart),
            "step-end" => return Ok(Self::StepEnd),
            _ => {}
        }

        let unknown = || TimingError::UnknownTimingFunction(raw.to_owned());
        let args = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(unknown)?;

        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| unknown())?;

        match values.as_slice() {
            [x1, y1, x2, y2] => Self::cubic_bezier(*x1, *y1, *x2, *y2),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::StepStart => f.write_str("step-start"),
            Self::StepEnd => f.write_str("step-end"),
            Self::CubicBezier { x1, y1, x2, y2 } => write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

impl TryFrom<String> for TimingFunction {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimingFunction> for String {
    fn from(value: TimingFunction) -> Self {
        value.to_string()
    }
}

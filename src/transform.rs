//! Animated translation along one axis.
//!
//! A `Transform` is the value a browser would hold in `transform:
//! translateX(..)` together with its `transition` settings. Assigning a new
//! value while a non-zero duration is configured starts a transition from
//! whatever is rendered right now; the owner is told when it will end and
//! calls [`Transform::finish`] at that time.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::time::Duration;

use serde::Serialize;

use crate::timing::{TimingFunction, TransitionDuration};

/// An in-flight interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    /// Clock time the transition started.
    pub started: Duration,
    pub length: Duration,
    pub timing: TimingFunction,
}

impl Transition {
    #[must_use]
    pub fn ends_at(&self) -> Duration {
        self.started + self.length
    }

    /// Interpolated value at clock time `now`.
    #[must_use]
    pub fn sample(&self, now: Duration) -> f64 {
        if now >= self.ends_at() || self.length.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.started).as_secs_f64();
        let linear = elapsed / self.length.as_secs_f64();
        self.from + (self.to - self.from) * self.timing.progress(linear)
    }
}

/// Values reported when a transition lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformComplete {
    pub previous: f64,
    pub next: f64,
}

#[derive(Debug, Clone)]
pub struct Transform {
    value: f64,
    previous: f64,
    duration: TransitionDuration,
    timing: TimingFunction,
    transition: Option<Transition>,
}

impl Transform {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            previous: value,
            duration: TransitionDuration::ZERO,
            timing: TimingFunction::Linear,
            transition: None,
        }
    }

    /// Target value (where the transform ends up once any transition lands).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value held before the most recent assignment.
    #[must_use]
    pub fn previous(&self) -> f64 {
        self.previous
    }

    #[must_use]
    pub fn duration(&self) -> TransitionDuration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: TransitionDuration) {
        self.duration = duration;
    }

    #[must_use]
    pub fn timing(&self) -> TimingFunction {
        self.timing
    }

    pub fn set_timing(&mut self, timing: TimingFunction) {
        self.timing = timing;
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The value currently on screen.
    #[must_use]
    pub fn rendered(&self, now: Duration) -> f64 {
        self.transition.map_or(self.value, |t| t.sample(now))
    }

    /// Assign a new value at clock time `now`.
    ///
    /// Returns the completion time when a transition was started. With a zero
    /// duration, or when the rendered value already equals `value`, the value
    /// applies immediately and any in-flight transition is dropped without
    /// completing.
    pub fn assign(&mut self, now: Duration, value: f64) -> Option<Duration> {
        let from = self.rendered(now);
        self.previous = self.value;
        self.value = value;

        #[allow(clippy::float_cmp)]
        let unchanged = from == value;
        if self.duration.is_zero() || unchanged {
            self.transition = None;
            return None;
        }

        let transition = Transition {
            from,
            to: value,
            started: now,
            length: self.duration.as_duration(),
            timing: self.timing,
        };
        self.transition = Some(transition);
        Some(transition.ends_at())
    }

    /// Land the in-flight transition.
    pub fn finish(&mut self) -> TransformComplete {
        self.transition = None;
        TransformComplete { previous: self.previous, next: self.value }
    }

    /// Units per second covered by the most recent assignment; zero when no
    /// duration is configured.
    #[must_use]
    pub fn speed(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.value - self.previous) / self.duration.as_secs_f64()
    }
}

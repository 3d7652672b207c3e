//! Positioned elements: identity, matching attributes, size, per-axis motion
//! and the per-frame bounding-rectangle cache.
//!
//! Elements are created and driven by a [`crate::game::Game`]; on their own
//! they only know how to lay themselves out for a given viewport.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_ELEMENT_KIND, DEFAULT_ELEMENT_SIZE};
use crate::error::GameError;
use crate::event::EventBus;
use crate::geometry::{Point, Rect};
use crate::motion::{Axis, AxisMotion, AxisRange};
use crate::scheduler::TaskId;
use crate::selector::Matchable;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Attributes read when an element is spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Kind matched by bare selectors (`player`, `wall`).
    pub kind: String,
    /// Matched by `#name` selectors.
    pub name: Option<String>,
    /// Matched by `.class` selectors.
    pub classes: Vec<String>,
    /// Registered behavior to run once the element is configured.
    #[serde(rename = "is")]
    pub behavior: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Initial horizontal speed in units per second.
    pub hspeed: f64,
    /// Initial vertical speed in units per second.
    pub vspeed: f64,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// Pinned to the viewport: scrolling does not affect its layout.
    pub sticky: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_ELEMENT_KIND.to_owned(),
            name: None,
            classes: Vec::new(),
            behavior: None,
            x: 0.0,
            y: 0.0,
            width: DEFAULT_ELEMENT_SIZE,
            height: DEFAULT_ELEMENT_SIZE,
            hspeed: 0.0,
            vspeed: 0.0,
            x_range: AxisRange::UNBOUNDED,
            y_range: AxisRange::UNBOUNDED,
            sticky: false,
        }
    }
}

impl ElementConfig {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), ..Self::default() }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    #[must_use]
    pub fn with_speed(mut self, hspeed: f64, vspeed: f64) -> Self {
        self.hspeed = hspeed;
        self.vspeed = vspeed;
        self
    }

    #[must_use]
    pub fn with_ranges(mut self, x_range: AxisRange, y_range: AxisRange) -> Self {
        self.x_range = x_range;
        self.y_range = y_range;
        self
    }

    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] for an inverted axis range.
    pub fn validate(&self) -> Result<(), GameError> {
        self.x_range.validate()?;
        self.y_range.validate()
    }
}

/// What an element needs to know about its viewport to lay itself out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Viewport position on the host page.
    pub origin: Point,
    pub zoom: f64,
    pub scroll: Point,
}

#[derive(Debug)]
pub struct Element {
    id: ElementId,
    kind: String,
    name: Option<String>,
    classes: Vec<String>,
    sticky: bool,
    x_range: AxisRange,
    y_range: AxisRange,
    width: f64,
    height: f64,
    motion_x: AxisMotion,
    motion_y: AxisMotion,
    rect_cache: Option<Rect>,
    /// Scheduled expiry of `rect_cache`.
    invalidation: Option<TaskId>,
    bus: EventBus,
}

impl Element {
    /// Build an element at the origin; the game applies the configured
    /// position and speed afterwards so the usual events fire.
    #[must_use]
    pub fn new(id: ElementId, config: &ElementConfig) -> Self {
        Self {
            id,
            kind: config.kind.clone(),
            name: config.name.clone(),
            classes: config.classes.clone(),
            sticky: config.sticky,
            x_range: config.x_range,
            y_range: config.y_range,
            width: config.width.max(0.0),
            height: config.height.max(0.0),
            motion_x: AxisMotion::new(0.0),
            motion_y: AxisMotion::new(0.0),
            rect_cache: None,
            invalidation: None,
            bus: EventBus::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    #[must_use]
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x_range,
            Axis::Y => self.y_range,
        }
    }

    pub fn set_range(&mut self, axis: Axis, range: AxisRange) {
        match axis {
            Axis::X => self.x_range = range,
            Axis::Y => self.y_range = range,
        }
    }

    /// Unscaled size as written by `resize`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    #[must_use]
    pub fn motion(&self, axis: Axis) -> &AxisMotion {
        match axis {
            Axis::X => &self.motion_x,
            Axis::Y => &self.motion_y,
        }
    }

    pub fn motion_mut(&mut self, axis: Axis) -> &mut AxisMotion {
        match axis {
            Axis::X => &mut self.motion_x,
            Axis::Y => &mut self.motion_y,
        }
    }

    /// Bounding rectangle from live layout at clock time `now`.
    ///
    /// The on-screen rectangle is scaled by the viewport zoom and shifted by
    /// its scroll; this undoes both so the result is in game units. A zero
    /// zoom collapses the size to nothing.
    #[must_use]
    pub fn layout_rect(&self, now: Duration, view: &ViewportMetrics) -> Rect {
        let zoom = view.zoom.abs();
        let scroll = if self.sticky { Point::default() } else { view.scroll };

        let translate_x = self.motion_x.transform().rendered(now);
        let translate_y = self.motion_y.transform().rendered(now);
        let screen_x = view.origin.x + (translate_x - scroll.x) * zoom;
        let screen_y = view.origin.y + (translate_y - scroll.y) * zoom;

        if zoom == 0.0 {
            return Rect::new(screen_x.floor() + scroll.x, screen_y.floor() + scroll.y, 0.0, 0.0);
        }

        Rect::new(
            (screen_x / zoom).floor() + scroll.x,
            (screen_y / zoom).floor() + scroll.y,
            self.width,
            self.height,
        )
    }

    #[must_use]
    pub fn cached_rect(&self) -> Option<Rect> {
        self.rect_cache
    }

    /// Store a freshly computed rectangle with the timer that will expire it.
    pub fn cache_rect(&mut self, rect: Rect, invalidation: TaskId) {
        self.rect_cache = Some(rect);
        self.invalidation = Some(invalidation);
    }

    /// Drop the cached rectangle. Returns the expiry timer to cancel.
    pub fn invalidate_rect(&mut self) -> Option<TaskId> {
        self.rect_cache = None;
        self.invalidation.take()
    }

    /// Drop every completion handler and hand back every outstanding timer.
    pub fn release(&mut self) -> Vec<TaskId> {
        let mut timers = Vec::new();
        timers.extend(self.invalidate_rect());
        for axis in [Axis::X, Axis::Y] {
            let motion = self.motion_mut(axis);
            motion.take_pending();
            timers.extend(motion.replace_timer(None));
        }
        timers
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }
}

impl Matchable for Element {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

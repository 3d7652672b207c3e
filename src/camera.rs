#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::element::ElementId;
use crate::geometry::Point;
use crate::motion::AxisRange;
use crate::scheduler::TaskId;

/// Scroll state of a viewport plus the element it follows.
///
/// `scroll` is in game units and always within `scroll_x` / `scroll_y`.
#[derive(Debug, Clone)]
pub struct Camera {
    scroll: Point,
    scroll_x: AxisRange,
    scroll_y: AxisRange,
    target: Option<ElementId>,
    offset: Point,
    /// Scheduled next follow tick.
    clock: Option<TaskId>,
}

impl Camera {
    #[must_use]
    pub fn new(scroll_x: AxisRange, scroll_y: AxisRange) -> Self {
        let mut camera =
            Self { scroll: Point::default(), scroll_x, scroll_y, target: None, offset: Point::default(), clock: None };
        camera.set_scroll(Point::default());
        camera
    }

    #[must_use]
    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Clamp and floor `scroll` into the bounds, then apply it.
    pub fn set_scroll(&mut self, scroll: Point) -> Point {
        self.scroll = Point::new(self.scroll_x.bound(scroll.x), self.scroll_y.bound(scroll.y));
        self.scroll
    }

    #[must_use]
    pub fn bounds(&self) -> (AxisRange, AxisRange) {
        (self.scroll_x, self.scroll_y)
    }

    /// Replace the bounds and re-clamp the current scroll.
    pub fn set_bounds(&mut self, scroll_x: AxisRange, scroll_y: AxisRange) {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self.set_scroll(self.scroll);
    }

    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Follow `target`. Returns the previous follow clock to cancel.
    pub fn attach(&mut self, target: ElementId, offset: Point) -> Option<TaskId> {
        self.target = Some(target);
        self.offset = offset;
        self.clock.take()
    }

    /// Stop following. Returns the follow clock to cancel.
    pub fn detach(&mut self) -> Option<TaskId> {
        self.target = None;
        self.offset = Point::default();
        self.clock.take()
    }

    #[must_use]
    pub fn clock(&self) -> Option<TaskId> {
        self.clock
    }

    pub fn set_clock(&mut self, clock: TaskId) {
        self.clock = Some(clock);
    }

    pub fn take_clock(&mut self) -> Option<TaskId> {
        self.clock.take()
    }

    /// Scroll that centers a target whose center is `center` in a viewport
    /// of `width` × `height`, shifted by the follow offset and clamped.
    #[must_use]
    pub fn follow_position(&self, center: Point, width: f64, height: f64) -> Point {
        Point::new(
            self.scroll_x.bound(center.x + self.offset.x - width / 2.0),
            self.scroll_y.bound(center.y + self.offset.y - height / 2.0),
        )
    }

    /// Convert a viewport-relative point to game coordinates.
    #[must_use]
    pub fn to_world(&self, view: Point) -> Point {
        Point::new(view.x + self.scroll.x, view.y + self.scroll.y)
    }

    /// Convert a game point to viewport-relative coordinates.
    #[must_use]
    pub fn to_view(&self, world: Point) -> Point {
        Point::new(world.x - self.scroll.x, world.y - self.scroll.y)
    }
}

//! The game viewport: owns every element and everything scheduled on them.
//!
//! DESIGN
//! ======
//! One `Game` is one virtual clock. Transition ends, collision polls, camera
//! ticks and rect-cache expiry are all tasks on a single [`Scheduler`], run in
//! due order by [`Game::advance`]. Elements are only ever created by their
//! game, so every operation takes an [`ElementId`] and fails with
//! [`GameError::UnknownElement`] for ids that were never spawned here or have
//! been despawned.
//!
//! Events are published synchronously on the owning bus (the element's, or
//! the game's for state changes) and appended to a journal that hosts drain
//! with [`Game::drain_events`].

#[cfg(test)]
#[path = "game_test.rs"]
mod game_test;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::camera::Camera;
use crate::collision::{CollisionObserver, CollisionScope, Contact};
use crate::config::{GameConfig, collision_interval, frame_interval, validate_fps, validate_zoom};
use crate::consts::SPEED_SWEEP_DISTANCE;
use crate::element::{Element, ElementConfig, ElementId, ViewportMetrics};
use crate::error::GameError;
use crate::event::{Control, Event, EventBus, EventKind, SubscriptionId};
use crate::geometry::{Point, Rect};
use crate::motion::{Axis, AxisRange, Behavior, MotionState, MoveDetail, MoveOptions, PendingMove};
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    CollisionPoll,
    CameraFollow,
    InvalidateRect(ElementId),
    TransitionEnd(ElementId, Axis),
}

pub struct Game {
    fps: f64,
    width: f64,
    height: f64,
    zoom: f64,
    origin: Point,
    /// Fixed polling interval; `None` follows the frame rate.
    collision_interval: Option<Duration>,
    collision_root: Option<Selector>,
    state: Option<String>,
    pointer: Point,
    elements: HashMap<ElementId, Element>,
    /// Spawn order, used as scene order for selector matching.
    order: Vec<ElementId>,
    observer: CollisionObserver,
    camera: Camera,
    scheduler: Scheduler<Task>,
    bus: EventBus,
    journal: Vec<Event>,
    registry: Rc<Registry>,
}

impl Game {
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_registry(config, Registry::new())
    }

    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn with_registry(config: GameConfig, registry: Registry) -> Result<Self, GameError> {
        config.validate()?;
        let fixed_interval = config.collision_interval_ms.map(collision_interval).transpose()?;
        let collision_root = config.collision_root()?;
        let poll_every = fixed_interval.unwrap_or_else(|| frame_interval(config.fps));

        info!(fps = config.fps, width = config.width, height = config.height, zoom = config.zoom, "game created");

        Ok(Self {
            fps: config.fps,
            width: config.width.max(0.0),
            height: config.height.max(0.0),
            zoom: config.zoom,
            origin: config.origin,
            collision_interval: fixed_interval,
            collision_root,
            state: config.state,
            pointer: Point::default(),
            elements: HashMap::new(),
            order: Vec::new(),
            observer: CollisionObserver::new(poll_every),
            camera: Camera::new(config.scroll_x, config.scroll_y),
            scheduler: Scheduler::new(),
            bus: EventBus::new(),
            journal: Vec::new(),
            registry: Rc::new(registry),
        })
    }

    // =========================================================================
    // VIEWPORT
    // =========================================================================

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// # Errors
    ///
    /// [`GameError::InvalidFrameRate`] unless `fps` is finite and positive.
    pub fn set_fps(&mut self, fps: f64) -> Result<(), GameError> {
        validate_fps(fps)?;
        self.fps = fps;
        if self.collision_interval.is_none() {
            self.observer.set_interval(frame_interval(fps));
        }
        Ok(())
    }

    /// Length of one frame: the rect-cache lifetime and camera tick.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.fps)
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// # Errors
    ///
    /// [`GameError::InvalidZoom`] unless `zoom` is finite and not negative.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), GameError> {
        validate_zoom(zoom)?;
        self.zoom = zoom;
        self.invalidate_all();
        Ok(())
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        self.invalidate_all();
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(0.0);
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height.max(0.0);
    }

    /// The viewport's own rectangle, in the same space as element rects.
    #[must_use]
    pub fn viewport_rect(&self) -> Rect {
        let zoom = self.zoom.abs();
        if zoom == 0.0 {
            return Rect::new(self.origin.x.floor(), self.origin.y.floor(), 0.0, 0.0);
        }
        Rect::new((self.origin.x / zoom).floor(), (self.origin.y / zoom).floor(), self.width, self.height)
    }

    #[must_use]
    pub fn scroll(&self) -> Point {
        self.camera.scroll()
    }

    /// Scroll the viewport, clamped to the scroll bounds. Returns the applied
    /// scroll.
    pub fn set_scroll(&mut self, scroll: Point) -> Point {
        let applied = self.camera.set_scroll(scroll);
        self.invalidate_all();
        applied
    }

    /// # Errors
    ///
    /// [`GameError::InvalidRange`] for an inverted range.
    pub fn set_scroll_bounds(&mut self, scroll_x: AxisRange, scroll_y: AxisRange) -> Result<(), GameError> {
        scroll_x.validate()?;
        scroll_y.validate()?;
        self.camera.set_bounds(scroll_x, scroll_y);
        self.invalidate_all();
        Ok(())
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Replace the game state and publish `state-change` on the game bus.
    pub fn set_state(&mut self, next: impl Into<String>) {
        let next = next.into();
        let previous = self.state.replace(next.clone());
        debug!(?previous, %next, "game state changed");
        self.emit(Event::StateChange { previous, next });
    }

    /// Record a pointer position given in page coordinates.
    pub fn pointer_moved(&mut self, page: Point) {
        self.pointer = Point::new(page.x - self.origin.x, page.y - self.origin.y);
    }

    /// Last pointer position relative to the viewport origin.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Last pointer position in game coordinates, accounting for scroll.
    #[must_use]
    pub fn pointer_world(&self) -> Point {
        self.camera.to_world(self.pointer)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics { origin: self.origin, zoom: self.zoom, scroll: self.camera.scroll() }
    }

    fn invalidate_all(&mut self) {
        for element in self.elements.values_mut() {
            if let Some(timer) = element.invalidate_rect() {
                self.scheduler.cancel(timer);
            }
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Create an element, place it, set its speed, then run its behavior.
    ///
    /// # Errors
    ///
    /// Fails on an invalid range or an unknown behavior. A non-finite position
    /// or an error returned by the behavior also fails, and the element is
    /// despawned again.
    pub fn spawn(&mut self, config: ElementConfig) -> Result<ElementId, GameError> {
        config.validate()?;
        let behavior = config.behavior.as_deref().map(|name| self.registry.get(name)).transpose()?;

        let id = Uuid::new_v4();
        self.elements.insert(id, Element::new(id, &config));
        self.order.push(id);
        debug!(%id, kind = %config.kind, "element spawned");

        let started = match behavior {
            Some(behavior) => self.place(id, &config).and_then(|()| behavior(self, id)),
            None => self.place(id, &config),
        };
        if let Err(err) = started {
            if self.contains(id) {
                self.despawn(id)?;
            }
            return Err(err);
        }
        Ok(id)
    }

    fn place(&mut self, id: ElementId, config: &ElementConfig) -> Result<(), GameError> {
        self.set_x(id, config.x)?;
        self.set_y(id, config.y)?;
        self.set_hspeed(id, config.hspeed)?;
        self.set_vspeed(id, config.vspeed)
    }

    /// Remove an element: cancel its timers, forget its collisions, detach
    /// the camera if it followed it, then publish `destroy`.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn despawn(&mut self, id: ElementId) -> Result<(), GameError> {
        let element = self.elements.get_mut(&id).ok_or(GameError::UnknownElement(id))?;
        for timer in element.release() {
            self.scheduler.cancel(timer);
        }

        self.observer.forget(id);
        if self.observer.is_empty() {
            self.stop_collision_clock();
        }
        if self.camera.target() == Some(id) {
            self.detach_view();
        }

        self.emit(Event::Destroy { target: id });
        self.elements.remove(&id);
        self.order.retain(|e| *e != id);
        debug!(%id, "element despawned");
        Ok(())
    }

    /// Despawn everything and stop every clock. Nothing is left scheduled.
    ///
    /// # Errors
    ///
    /// Propagates despawn failures; none are expected.
    pub fn detach(&mut self) -> Result<(), GameError> {
        for id in self.order.clone() {
            self.despawn(id)?;
        }
        self.disconnect_collisions();
        self.detach_view();
        info!(pending = self.scheduler.len(), "game detached");
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Attached elements in spawn order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, GameError> {
        self.elements.get_mut(&id).ok_or(GameError::UnknownElement(id))
    }

    fn get(&self, id: ElementId) -> Result<&Element, GameError> {
        self.elements.get(&id).ok_or(GameError::UnknownElement(id))
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Bounding rectangle, cached for one frame.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn rect(&mut self, id: ElementId) -> Result<Rect, GameError> {
        let now = self.now();
        let view = self.metrics();
        let lifetime = self.frame_interval();
        let element = self.elements.get_mut(&id).ok_or(GameError::UnknownElement(id))?;
        if let Some(rect) = element.cached_rect() {
            return Ok(rect);
        }
        let rect = element.layout_rect(now, &view);
        let timer = self.scheduler.schedule_after(lifetime, Task::InvalidateRect(id));
        element.cache_rect(rect, timer);
        Ok(rect)
    }

    /// Rect origin relative to the viewport.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn position(&mut self, id: ElementId) -> Result<Point, GameError> {
        let rect = self.rect(id)?;
        let viewport = self.viewport_rect();
        Ok(Point::new(rect.x - viewport.x, rect.y - viewport.y))
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn x(&mut self, id: ElementId) -> Result<f64, GameError> {
        Ok(self.position(id)?.x)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn y(&mut self, id: ElementId) -> Result<f64, GameError> {
        Ok(self.position(id)?.y)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn element_width(&mut self, id: ElementId) -> Result<f64, GameError> {
        Ok(self.rect(id)?.width)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn element_height(&mut self, id: ElementId) -> Result<f64, GameError> {
        Ok(self.rect(id)?.height)
    }

    /// Position plus half the size.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn center(&mut self, id: ElementId) -> Result<Point, GameError> {
        let rect = self.rect(id)?;
        let viewport = self.viewport_rect();
        let center = rect.center();
        Ok(Point::new(center.x - viewport.x, center.y - viewport.y))
    }

    /// Place on the x axis, clamped and floored. Animates with the axis's
    /// current duration.
    ///
    /// # Errors
    ///
    /// [`GameError::NonFiniteCoordinate`] for NaN or infinite `x`,
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_x(&mut self, id: ElementId, x: f64) -> Result<(), GameError> {
        self.assign_axis(id, Axis::X, x)
    }

    /// # Errors
    ///
    /// [`GameError::NonFiniteCoordinate`] for NaN or infinite `y`,
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_y(&mut self, id: ElementId, y: f64) -> Result<(), GameError> {
        self.assign_axis(id, Axis::Y, y)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> Result<(), GameError> {
        self.set_x(id, position.x)?;
        self.set_y(id, position.y)
    }

    /// Set the rendered size directly. Negative sizes become zero.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn resize(&mut self, id: ElementId, width: f64, height: f64) -> Result<(), GameError> {
        let element = self.element_mut(id)?;
        element.set_size(width, height);
        if let Some(timer) = element.invalidate_rect() {
            self.scheduler.cancel(timer);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`GameError::InvalidRange`] for an inverted range,
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_range(&mut self, id: ElementId, axis: Axis, range: AxisRange) -> Result<(), GameError> {
        range.validate()?;
        self.element_mut(id)?.set_range(axis, range);
        Ok(())
    }

    fn assign_axis(&mut self, id: ElementId, axis: Axis, value: f64) -> Result<(), GameError> {
        let now = self.now();
        let element = self.elements.get_mut(&id).ok_or(GameError::UnknownElement(id))?;
        if !value.is_finite() {
            return Err(GameError::NonFiniteCoordinate { id, axis, value });
        }
        let value = element.range(axis).bound(value);

        let motion = element.motion_mut(axis);
        if let Some(timer) = motion.replace_timer(None) {
            self.scheduler.cancel(timer);
        }
        if let Some(ends_at) = motion.transform_mut().assign(now, value) {
            let timer = self.scheduler.schedule_at(ends_at, Task::TransitionEnd(id, axis));
            motion.replace_timer(Some(timer));
        }

        if let Some(timer) = element.invalidate_rect() {
            self.scheduler.cancel(timer);
        }
        Ok(())
    }

    /// Live floored value of one axis, bypassing the rect cache.
    fn live_value(&self, id: ElementId, axis: Axis) -> Result<f64, GameError> {
        Ok(self.get(id)?.motion(axis).transform().rendered(self.now()).floor())
    }

    // =========================================================================
    // MOTION
    // =========================================================================

    /// Start a move on one axis.
    ///
    /// Returns `Ok(false)` when a `before-move` subscriber canceled it, in
    /// which case nothing changed.
    ///
    /// # Errors
    ///
    /// [`GameError::ConflictingMoveOptions`] if both duration and speed are
    /// set, [`GameError::NonFiniteCoordinate`] for a NaN or infinite target,
    /// [`GameError::Timing`] if the speed is too slow for a representable
    /// duration, [`GameError::UnknownElement`] if `id` is not attached.
    pub fn move_to(&mut self, id: ElementId, axis: Axis, target: f64, options: MoveOptions) -> Result<bool, GameError> {
        let range = self.get(id)?.range(axis);
        if options.is_conflicting() {
            return Err(GameError::ConflictingMoveOptions { id, axis });
        }
        if !target.is_finite() {
            return Err(GameError::NonFiniteCoordinate { id, axis, value: target });
        }

        let previous = self.live_value(id, axis)?;
        let next = range.bound(target);
        let detail = MoveDetail {
            previous,
            next,
            duration: options.effective_duration(next - previous)?,
            timing: options.timing,
            behavior: options.behavior,
        };

        if self.emit(Event::BeforeMove { target: id, axis, detail }) {
            debug!(%id, %axis, previous, next, "move canceled");
            return Ok(false);
        }

        self.element_mut(id)?.motion_mut(axis).begin(PendingMove { detail, options });
        self.assign_axis(id, axis, next)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// See [`Game::move_to`].
    pub fn move_x(&mut self, id: ElementId, x: f64, options: MoveOptions) -> Result<bool, GameError> {
        self.move_to(id, Axis::X, x, options)
    }

    /// # Errors
    ///
    /// See [`Game::move_to`].
    pub fn move_y(&mut self, id: ElementId, y: f64, options: MoveOptions) -> Result<bool, GameError> {
        self.move_to(id, Axis::Y, y, options)
    }

    fn complete_transition(&mut self, id: ElementId, axis: Axis) -> Result<(), GameError> {
        let Some(element) = self.elements.get_mut(&id) else {
            return Ok(());
        };
        let motion = element.motion_mut(axis);
        motion.replace_timer(None);
        let landed = motion.transform_mut().finish();
        let pending = motion.take_pending();
        if let Some(timer) = element.invalidate_rect() {
            self.scheduler.cancel(timer);
        }

        self.emit(Event::TransformComplete { target: id, axis, previous: landed.previous, next: landed.next });

        let Some(pending) = pending else {
            return Ok(());
        };
        if self.emit(Event::AfterMove { target: id, axis, detail: pending.detail }) {
            return Ok(());
        }
        if let Some(target) = pending.continuation(landed.next) {
            self.move_to(id, axis, target, pending.options)?;
        }
        Ok(())
    }

    /// Units per second on one axis for the current transition.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn speed(&self, id: ElementId, axis: Axis) -> Result<f64, GameError> {
        Ok(self.get(id)?.motion(axis).transform().speed())
    }

    /// Move at a constant speed, or halt when `speed` is 0.
    ///
    /// # Errors
    ///
    /// [`GameError::Timing`] if `speed` is too slow for a representable
    /// duration, [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_speed(&mut self, id: ElementId, axis: Axis, speed: f64) -> Result<(), GameError> {
        if speed == 0.0 || !speed.is_finite() {
            let current = self.live_value(id, axis)?;
            let motion = self.element_mut(id)?.motion_mut(axis);
            let animated = !motion.transform().duration().is_zero();
            motion.halt();
            if !animated {
                return Ok(());
            }
            return self.assign_axis(id, axis, current);
        }

        let current = self.live_value(id, axis)?;
        let target = current + SPEED_SWEEP_DISTANCE * speed.signum();
        let options = MoveOptions::with_speed(speed.abs()).behavior(Behavior::Repeat);
        self.move_to(id, axis, target, options)?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn hspeed(&self, id: ElementId) -> Result<f64, GameError> {
        self.speed(id, Axis::X)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn vspeed(&self, id: ElementId) -> Result<f64, GameError> {
        self.speed(id, Axis::Y)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_hspeed(&mut self, id: ElementId, speed: f64) -> Result<(), GameError> {
        self.set_speed(id, Axis::X, speed)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn set_vspeed(&mut self, id: ElementId, speed: f64) -> Result<(), GameError> {
        self.set_speed(id, Axis::Y, speed)
    }

    /// Halt both axes where they are.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn stop(&mut self, id: ElementId) -> Result<(), GameError> {
        self.set_speed(id, Axis::X, 0.0)?;
        self.set_speed(id, Axis::Y, 0.0)
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn motion_state(&self, id: ElementId, axis: Axis) -> Result<MotionState, GameError> {
        Ok(self.get(id)?.motion(axis).state())
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn subscribe(
        &mut self,
        id: ElementId,
        kind: EventKind,
        handler: impl FnMut(&Event) -> Control + 'static,
    ) -> Result<SubscriptionId, GameError> {
        Ok(self.element_mut(id)?.bus_mut().subscribe(kind, handler))
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn subscribe_many(
        &mut self,
        id: ElementId,
        kinds: &[EventKind],
        handler: impl FnMut(&Event) -> Control + 'static,
    ) -> Result<SubscriptionId, GameError> {
        Ok(self.element_mut(id)?.bus_mut().subscribe_many(kinds, handler))
    }

    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn unsubscribe(&mut self, id: ElementId, subscription: SubscriptionId) -> Result<bool, GameError> {
        Ok(self.element_mut(id)?.bus_mut().unsubscribe(subscription))
    }

    /// Subscribe to game-level events such as `state-change`.
    pub fn subscribe_game(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&Event) -> Control + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe_game(&mut self, subscription: SubscriptionId) -> bool {
        self.bus.unsubscribe(subscription)
    }

    /// Take every event published since the last drain, in publish order.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.journal)
    }

    /// Publish on the owning bus and record in the journal. Returns whether a
    /// cancelable event was canceled.
    fn emit(&mut self, event: Event) -> bool {
        let canceled = match event.target() {
            Some(target) => self.elements.get_mut(&target).is_some_and(|el| el.bus_mut().publish(&event)),
            None => self.bus.publish(&event),
        };
        trace!(kind = ?event.kind(), target = ?event.target(), canceled, "event published");
        self.journal.push(event);
        canceled
    }

    // =========================================================================
    // COLLISIONS
    // =========================================================================

    /// Watch `id` for collisions with elements matching `pattern` and start
    /// polling if it is not running. Returns false if already watched.
    ///
    /// # Errors
    ///
    /// [`GameError::Selector`] for a malformed pattern,
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn observe_collisions(&mut self, id: ElementId, pattern: &str) -> Result<bool, GameError> {
        self.get(id)?;
        let selector = Selector::parse(pattern)?;
        let added = self.observer.observe(id, selector);
        self.start_collision_clock();
        Ok(added)
    }

    /// Stop watching one pattern, or all of them. Returns false if `id` was
    /// not watched. Polling stops once nothing is watched.
    ///
    /// # Errors
    ///
    /// [`GameError::Selector`] for a malformed pattern.
    pub fn unobserve_collisions(&mut self, id: ElementId, pattern: Option<&str>) -> Result<bool, GameError> {
        let selector = pattern.map(Selector::parse).transpose()?;
        let known = self.observer.unobserve(id, selector.as_ref());
        if self.observer.is_empty() {
            self.stop_collision_clock();
        }
        Ok(known)
    }

    /// Watch `id` against `pattern` and call `handler` on every
    /// `collision-start`.
    ///
    /// # Errors
    ///
    /// See [`Game::observe_collisions`].
    pub fn on_collision(
        &mut self,
        id: ElementId,
        pattern: &str,
        handler: impl FnMut(&Event) -> Control + 'static,
    ) -> Result<SubscriptionId, GameError> {
        self.observe_collisions(id, pattern)?;
        self.subscribe(id, EventKind::CollisionStart, handler)
    }

    /// Stop watching everything and stop polling.
    pub fn disconnect_collisions(&mut self) {
        if let Some(clock) = self.observer.disconnect() {
            self.scheduler.cancel(clock);
            info!("collision polling stopped");
        }
    }

    #[must_use]
    pub fn is_colliding(&self, id: ElementId, other: ElementId) -> bool {
        self.observer.is_colliding(id, other)
    }

    #[must_use]
    pub fn observer(&self) -> &CollisionObserver {
        &self.observer
    }

    fn start_collision_clock(&mut self) {
        if self.observer.clock().is_some() || self.observer.is_empty() {
            return;
        }
        let interval = self.observer.interval();
        let clock = self.scheduler.schedule_after(interval, Task::CollisionPoll);
        self.observer.set_clock(clock);
        info!(interval_ms = interval.as_secs_f64() * 1000.0, "collision polling started");
    }

    fn stop_collision_clock(&mut self) {
        if let Some(clock) = self.observer.take_clock() {
            self.scheduler.cancel(clock);
            info!("collision polling stopped");
        }
    }

    fn poll_collisions(&mut self) {
        self.observer.take_clock();
        if self.observer.is_empty() {
            info!("collision polling stopped");
            return;
        }

        let now = self.now();
        let view = self.metrics();
        let rects: HashMap<ElementId, Rect> = self
            .elements
            .iter()
            .map(|(id, el)| (*id, el.cached_rect().unwrap_or_else(|| el.layout_rect(now, &view))))
            .collect();

        let changes = {
            let scene = SceneSnapshot {
                elements: &self.elements,
                order: &self.order,
                rects: &rects,
                root: self.collision_root.as_ref(),
            };
            self.observer.poll(&scene)
        };

        for change in changes {
            let event = match change.contact {
                Contact::Start => Event::CollisionStart { target: change.target, other: change.other },
                Contact::End => Event::CollisionEnd { target: change.target, other: change.other },
            };
            self.emit(event);
        }

        self.start_collision_clock();
    }

    // =========================================================================
    // CAMERA
    // =========================================================================

    /// Follow `id` with the camera, offset by `offset`. Scrolls immediately,
    /// then once per frame.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownElement`] if `id` is not attached.
    pub fn attach_view(&mut self, id: ElementId, offset: Point) -> Result<(), GameError> {
        self.get(id)?;
        if let Some(clock) = self.camera.attach(id, offset) {
            self.scheduler.cancel(clock);
        }
        info!(%id, "camera attached");
        self.follow_tick()
    }

    /// Stop following. Returns false if nothing was followed.
    pub fn detach_view(&mut self) -> bool {
        let target = self.camera.target();
        if let Some(clock) = self.camera.detach() {
            self.scheduler.cancel(clock);
        }
        if let Some(id) = target {
            info!(%id, "camera detached");
        }
        target.is_some()
    }

    fn follow_tick(&mut self) -> Result<(), GameError> {
        self.camera.take_clock();
        let Some(target) = self.camera.target() else {
            return Ok(());
        };
        if !self.contains(target) {
            self.detach_view();
            return Ok(());
        }

        let center = self.center(target)?;
        let scroll = self.camera.follow_position(center, self.width, self.height);
        self.set_scroll(scroll);

        let clock = self.scheduler.schedule_after(self.frame_interval(), Task::CameraFollow);
        self.camera.set_clock(clock);
        Ok(())
    }

    // =========================================================================
    // CLOCK
    // =========================================================================

    /// Run every task due within the next `dt`, in due order, then move the
    /// clock to `now + dt`.
    ///
    /// # Errors
    ///
    /// Propagates errors from follow-up moves; none are expected.
    pub fn advance(&mut self, dt: Duration) -> Result<(), GameError> {
        let until = self.now().saturating_add(dt);
        while let Some((_, task)) = self.scheduler.pop_due(until) {
            self.run(task)?;
        }
        self.scheduler.advance_to(until);
        Ok(())
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    fn run(&mut self, task: Task) -> Result<(), GameError> {
        match task {
            Task::CollisionPoll => {
                self.poll_collisions();
                Ok(())
            }
            Task::CameraFollow => self.follow_tick(),
            Task::InvalidateRect(id) => {
                if let Some(element) = self.elements.get_mut(&id) {
                    element.invalidate_rect();
                }
                Ok(())
            }
            Task::TransitionEnd(id, axis) => self.complete_transition(id, axis),
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("now", &self.now())
            .field("fps", &self.fps)
            .field("zoom", &self.zoom)
            .field("state", &self.state)
            .field("elements", &self.elements.len())
            .field("pending_tasks", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}

/// Rectangles and matching for one collision poll.
struct SceneSnapshot<'a> {
    elements: &'a HashMap<ElementId, Element>,
    order: &'a [ElementId],
    rects: &'a HashMap<ElementId, Rect>,
    root: Option<&'a Selector>,
}

impl CollisionScope for SceneSnapshot<'_> {
    fn matching(&self, selector: &Selector) -> Vec<ElementId> {
        self.order
            .iter()
            .filter(|id| {
                self.elements
                    .get(*id)
                    .is_some_and(|el| self.root.is_none_or(|root| root.matches(el)) && selector.matches(el))
            })
            .copied()
            .collect()
    }

    fn rect(&self, id: ElementId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }
}

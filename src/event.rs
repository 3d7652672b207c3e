//! Typed publish/subscribe per entity.
//!
//! Each element (and the game itself) owns an [`EventBus`]. Subscribers are
//! registered per [`EventKind`] and receive every published [`Event`] of that
//! kind. A subscriber may answer [`Control::Cancel`]; for cancelable events
//! the publisher learns that the action should be aborted. Every subscriber
//! still runs, matching the DOM `preventDefault` model.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::fmt;

use serde::Serialize;

use crate::element::ElementId;
use crate::motion::{Axis, MoveDetail};

/// Discriminant of an [`Event`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    CollisionStart,
    CollisionEnd,
    BeforeMoveX,
    BeforeMoveY,
    AfterMoveX,
    AfterMoveY,
    TransformComplete,
    Destroy,
    StateChange,
}

impl EventKind {
    #[must_use]
    pub fn before_move(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::BeforeMoveX,
            Axis::Y => Self::BeforeMoveY,
        }
    }

    #[must_use]
    pub fn after_move(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::AfterMoveX,
            Axis::Y => Self::AfterMoveY,
        }
    }

    /// Whether a subscriber can abort the action behind this event.
    #[must_use]
    pub fn is_cancelable(self) -> bool {
        matches!(self, Self::BeforeMoveX | Self::BeforeMoveY | Self::AfterMoveX | Self::AfterMoveY)
    }
}

/// A lifecycle notification with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    CollisionStart { target: ElementId, other: ElementId },
    CollisionEnd { target: ElementId, other: ElementId },
    BeforeMove { target: ElementId, axis: Axis, detail: MoveDetail },
    AfterMove { target: ElementId, axis: Axis, detail: MoveDetail },
    TransformComplete { target: ElementId, axis: Axis, previous: f64, next: f64 },
    Destroy { target: ElementId },
    StateChange { previous: Option<String>, next: String },
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CollisionStart { .. } => EventKind::CollisionStart,
            Self::CollisionEnd { .. } => EventKind::CollisionEnd,
            Self::BeforeMove { axis, .. } => EventKind::before_move(*axis),
            Self::AfterMove { axis, .. } => EventKind::after_move(*axis),
            Self::TransformComplete { .. } => EventKind::TransformComplete,
            Self::Destroy { .. } => EventKind::Destroy,
            Self::StateChange { .. } => EventKind::StateChange,
        }
    }

    /// The element the event is dispatched on; `None` for game-level events.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::CollisionStart { target, .. }
            | Self::CollisionEnd { target, .. }
            | Self::BeforeMove { target, .. }
            | Self::AfterMove { target, .. }
            | Self::TransformComplete { target, .. }
            | Self::Destroy { target } => Some(*target),
            Self::StateChange { .. } => None,
        }
    }

    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        self.kind().is_cancelable()
    }
}

/// A subscriber's answer to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    /// Abort the action behind a cancelable event. Ignored otherwise.
    Cancel,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Handler = Box<dyn FnMut(&Event) -> Control>;

struct Subscription {
    id: SubscriptionId,
    kinds: Vec<EventKind>,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&Event) -> Control + 'static) -> SubscriptionId {
        self.subscribe_many(&[kind], handler)
    }

    /// Register one handler for several kinds.
    pub fn subscribe_many(
        &mut self,
        kinds: &[EventKind],
        handler: impl FnMut(&Event) -> Control + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kinds: kinds.to_vec(), handler: Box::new(handler) });
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to every matching subscriber in subscription order.
    ///
    /// Returns true when the event is cancelable and at least one subscriber
    /// canceled it.
    pub fn publish(&mut self, event: &Event) -> bool {
        let kind = event.kind();
        let mut canceled = false;
        for subscription in &mut self.subscriptions {
            if !subscription.kinds.contains(&kind) {
                continue;
            }
            if (subscription.handler)(event) == Control::Cancel {
                canceled = true;
            }
        }
        canceled && kind.is_cancelable()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use super::*;
use crate::motion::Behavior;
use crate::timing::{TimingFunction, TransitionDuration};

fn detail() -> MoveDetail {
    MoveDetail {
        previous: 0.0,
        next: 10.0,
        duration: TransitionDuration::ZERO,
        timing: TimingFunction::Linear,
        behavior: Behavior::None,
    }
}

fn before_move_x() -> Event {
    Event::BeforeMove { target: Uuid::new_v4(), axis: Axis::X, detail: detail() }
}

// =============================================================
// EventKind / Event
// =============================================================

#[test]
fn move_kinds_follow_axis() {
    assert_eq!(EventKind::before_move(Axis::X), EventKind::BeforeMoveX);
    assert_eq!(EventKind::before_move(Axis::Y), EventKind::BeforeMoveY);
    assert_eq!(EventKind::after_move(Axis::Y), EventKind::AfterMoveY);
}

#[test]
fn only_move_events_are_cancelable() {
    assert!(EventKind::BeforeMoveX.is_cancelable());
    assert!(EventKind::AfterMoveY.is_cancelable());
    assert!(!EventKind::CollisionStart.is_cancelable());
    assert!(!EventKind::TransformComplete.is_cancelable());
    assert!(!EventKind::Destroy.is_cancelable());
    assert!(!EventKind::StateChange.is_cancelable());
}

#[test]
fn event_kind_and_target() {
    let target = Uuid::new_v4();
    let other = Uuid::new_v4();
    let event = Event::CollisionStart { target, other };
    assert_eq!(event.kind(), EventKind::CollisionStart);
    assert_eq!(event.target(), Some(target));

    let state = Event::StateChange { previous: None, next: "playing".into() };
    assert_eq!(state.target(), None);
}

#[test]
fn event_serializes_with_type_tag() {
    let event = Event::StateChange { previous: Some("menu".into()), next: "playing".into() };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["type"], "state-change");
    assert_eq!(json["next"], "playing");
}

// =============================================================
// EventBus
// =============================================================

#[test]
fn publish_reaches_matching_subscribers_only() {
    let mut bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    bus.subscribe(EventKind::BeforeMoveX, move |e| {
        log.borrow_mut().push(e.kind());
        Control::Continue
    });
    let log = Rc::clone(&seen);
    bus.subscribe(EventKind::Destroy, move |e| {
        log.borrow_mut().push(e.kind());
        Control::Continue
    });

    bus.publish(&before_move_x());
    assert_eq!(*seen.borrow(), vec![EventKind::BeforeMoveX]);
}

#[test]
fn cancel_is_reported_for_cancelable_events() {
    let mut bus = EventBus::new();
    bus.subscribe(EventKind::BeforeMoveX, |_| Control::Cancel);
    assert!(bus.publish(&before_move_x()));
}

#[test]
fn cancel_is_ignored_for_non_cancelable_events() {
    let mut bus = EventBus::new();
    bus.subscribe(EventKind::Destroy, |_| Control::Cancel);
    assert!(!bus.publish(&Event::Destroy { target: Uuid::new_v4() }));
}

#[test]
fn every_subscriber_runs_even_after_cancel() {
    let mut bus = EventBus::new();
    let calls = Rc::new(RefCell::new(0));
    bus.subscribe(EventKind::BeforeMoveX, |_| Control::Cancel);
    let counter = Rc::clone(&calls);
    bus.subscribe(EventKind::BeforeMoveX, move |_| {
        *counter.borrow_mut() += 1;
        Control::Continue
    });
    assert!(bus.publish(&before_move_x()));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn subscribe_many_listens_to_each_kind() {
    let mut bus = EventBus::new();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    bus.subscribe_many(&[EventKind::CollisionStart, EventKind::CollisionEnd], move |_| {
        *counter.borrow_mut() += 1;
        Control::Continue
    });
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    bus.publish(&Event::CollisionStart { target: a, other: b });
    bus.publish(&Event::CollisionEnd { target: a, other: b });
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut bus = EventBus::new();
    let id = bus.subscribe(EventKind::BeforeMoveX, |_| Control::Cancel);
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    assert!(bus.is_empty());
    assert!(!bus.publish(&before_move_x()));
}

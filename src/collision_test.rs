use uuid::Uuid;

use super::*;
use crate::selector::Matchable;

struct Thing {
    id: ElementId,
    kind: &'static str,
    rect: Rect,
}

impl Matchable for Thing {
    fn kind(&self) -> &str {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn has_class(&self, _class: &str) -> bool {
        false
    }
}

#[derive(Default)]
struct Scene {
    things: Vec<Thing>,
}

impl Scene {
    fn add(&mut self, kind: &'static str, rect: Rect) -> ElementId {
        let id = Uuid::new_v4();
        self.things.push(Thing { id, kind, rect });
        id
    }

    fn place(&mut self, id: ElementId, rect: Rect) {
        if let Some(thing) = self.things.iter_mut().find(|t| t.id == id) {
            thing.rect = rect;
        }
    }

    fn remove(&mut self, id: ElementId) {
        self.things.retain(|t| t.id != id);
    }
}

impl CollisionScope for Scene {
    fn matching(&self, selector: &Selector) -> Vec<ElementId> {
        self.things.iter().filter(|t| selector.matches(*t)).map(|t| t.id).collect()
    }

    fn rect(&self, id: ElementId) -> Option<Rect> {
        self.things.iter().find(|t| t.id == id).map(|t| t.rect)
    }
}

fn sel(raw: &str) -> Selector {
    Selector::parse(raw).expect("selector")
}

fn observer() -> CollisionObserver {
    CollisionObserver::new(Duration::from_millis(16))
}

fn square(x: f64) -> Rect {
    Rect::new(x, 0.0, 10.0, 10.0)
}

#[test]
fn overlap_then_separation_fires_start_then_end_once() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    let wall = scene.add("wall", square(5.0));
    let mut obs = observer();
    obs.observe(player, sel("wall"));

    let first = obs.poll(&scene);
    assert_eq!(first, vec![CollisionChange { target: player, other: wall, contact: Contact::Start }]);
    assert!(obs.poll(&scene).is_empty());
    assert!(obs.poll(&scene).is_empty());
    assert!(obs.is_colliding(player, wall));

    scene.place(wall, square(50.0));
    let last = obs.poll(&scene);
    assert_eq!(last, vec![CollisionChange { target: player, other: wall, contact: Contact::End }]);
    assert!(!obs.is_colliding(player, wall));
}

#[test]
fn edge_touching_is_not_a_collision() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    scene.add("wall", square(10.0));
    let mut obs = observer();
    obs.observe(player, sel("wall"));
    assert!(obs.poll(&scene).is_empty());
}

#[test]
fn target_never_collides_with_itself() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    let mut obs = observer();
    obs.observe(player, sel("*"));
    assert!(obs.poll(&scene).is_empty());
}

#[test]
fn overlapping_patterns_report_a_candidate_once() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    scene.add("wall", square(2.0));
    let mut obs = observer();
    obs.observe(player, sel("wall"));
    obs.observe(player, sel("*"));
    assert_eq!(obs.poll(&scene).len(), 1);
}

#[test]
fn observing_twice_is_a_no_op() {
    let mut obs = observer();
    let id = Uuid::new_v4();
    assert!(obs.observe(id, sel("wall")));
    assert!(!obs.observe(id, sel("wall")));
    assert!(obs.observe(id, sel("coin")));
}

#[test]
fn unobserving_last_pattern_forgets_target() {
    let mut obs = observer();
    let id = Uuid::new_v4();
    obs.observe(id, sel("wall"));
    obs.observe(id, sel("coin"));

    assert!(obs.unobserve(id, Some(&sel("wall"))));
    assert!(obs.is_observing(id));
    assert!(obs.unobserve(id, Some(&sel("coin"))));
    assert!(!obs.is_observing(id));
    assert!(obs.is_empty());
}

#[test]
fn unobserving_unknown_target_reports_false() {
    let mut obs = observer();
    assert!(!obs.unobserve(Uuid::new_v4(), None));
}

#[test]
fn candidate_that_stops_matching_is_dropped_silently() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    let coin = scene.add("coin", square(3.0));
    let mut obs = observer();
    obs.observe(player, sel("coin"));
    assert_eq!(obs.poll(&scene).len(), 1);

    scene.remove(coin);
    assert!(obs.poll(&scene).is_empty());
    assert!(obs.colliding(player).is_empty());
}

#[test]
fn forget_removes_element_as_collider() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    let wall = scene.add("wall", square(5.0));
    let mut obs = observer();
    obs.observe(player, sel("wall"));
    obs.poll(&scene);

    obs.forget(wall);
    assert!(!obs.is_colliding(player, wall));
    assert!(obs.is_observing(player));
}

#[test]
fn changes_follow_scene_order() {
    let mut scene = Scene::default();
    let player = scene.add("player", square(0.0));
    let a = scene.add("wall", square(1.0));
    let b = scene.add("wall", square(2.0));
    let mut obs = observer();
    obs.observe(player, sel("wall"));

    let others: Vec<_> = obs.poll(&scene).into_iter().map(|c| c.other).collect();
    assert_eq!(others, vec![a, b]);
}

#[test]
fn disconnect_clears_targets_and_hands_back_clock() {
    let mut scheduler: crate::scheduler::Scheduler<()> = crate::scheduler::Scheduler::new();
    let clock = scheduler.schedule_after(Duration::from_millis(16), ());
    let mut obs = observer();
    obs.observe(Uuid::new_v4(), sel("*"));
    obs.set_clock(clock);

    assert_eq!(obs.disconnect(), Some(clock));
    assert!(obs.is_empty());
    assert_eq!(obs.clock(), None);
}

#[test]
fn missing_target_rect_skips_target() {
    let mut scene = Scene::default();
    scene.add("wall", square(0.0));
    let mut obs = observer();
    obs.observe(Uuid::new_v4(), sel("wall"));
    assert!(obs.poll(&scene).is_empty());
}

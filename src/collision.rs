//! Pairwise collision watching by polling.
//!
//! DESIGN
//! ======
//! The observer keeps, per observed element, the set of patterns it watches
//! and the set of elements it currently collides with. Each poll re-matches
//! every pattern against the scene, intersects rectangles and reports edge
//! transitions only: a pair that keeps overlapping produces one `Start` and,
//! when it separates, one `End`. An element that stops matching while
//! colliding is dropped from the colliding set without an `End`.
//!
//! The scene is reached through [`CollisionScope`], so the observer never
//! borrows the game and can be tested against a plain table of rectangles.

#[cfg(test)]
#[path = "collision_test.rs"]
mod collision_test;

use std::collections::HashSet;
use std::time::Duration;

use crate::element::ElementId;
use crate::geometry::{Rect, intersects};
use crate::scheduler::TaskId;
use crate::selector::Selector;

/// The observer's view of the scene during one poll.
pub trait CollisionScope {
    /// Elements matching `selector`, in scene order.
    fn matching(&self, selector: &Selector) -> Vec<ElementId>;
    /// Current bounding rectangle of `id`, or `None` if it is gone.
    fn rect(&self, id: ElementId) -> Option<Rect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    Start,
    End,
}

/// One edge transition found by a poll, reported on `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionChange {
    pub target: ElementId,
    pub other: ElementId,
    pub contact: Contact,
}

#[derive(Debug)]
struct ObservedTarget {
    id: ElementId,
    patterns: Vec<Selector>,
    colliding: HashSet<ElementId>,
}

#[derive(Debug)]
pub struct CollisionObserver {
    interval: Duration,
    /// In observation order.
    targets: Vec<ObservedTarget>,
    /// Scheduled next poll. Present while anything is observed.
    clock: Option<TaskId>,
}

impl CollisionObserver {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval, targets: Vec::new(), clock: None }
    }

    /// Watch `target` against `pattern`. Returns false if it already was.
    pub fn observe(&mut self, target: ElementId, pattern: Selector) -> bool {
        let Some(observed) = self.target_mut(target) else {
            self.targets.push(ObservedTarget { id: target, patterns: vec![pattern], colliding: HashSet::new() });
            return true;
        };
        if observed.patterns.contains(&pattern) {
            return false;
        }
        observed.patterns.push(pattern);
        true
    }

    fn target(&self, id: ElementId) -> Option<&ObservedTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    fn target_mut(&mut self, id: ElementId) -> Option<&mut ObservedTarget> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Stop watching one pattern, or every pattern when `pattern` is `None`.
    /// A target left without patterns is forgotten. Returns false if
    /// `target` was not observed.
    pub fn unobserve(&mut self, target: ElementId, pattern: Option<&Selector>) -> bool {
        let Some(observed) = self.target_mut(target) else {
            return false;
        };
        if let Some(pattern) = pattern {
            observed.patterns.retain(|p| p != pattern);
        } else {
            observed.patterns.clear();
        }
        self.targets.retain(|t| !t.patterns.is_empty());
        true
    }

    /// Drop every trace of `id`: as an observed target and as a collider.
    pub fn forget(&mut self, id: ElementId) {
        self.targets.retain(|t| t.id != id);
        for observed in &mut self.targets {
            observed.colliding.remove(&id);
        }
    }

    /// Stop watching everything. Returns the polling clock to cancel.
    pub fn disconnect(&mut self) -> Option<TaskId> {
        self.targets.clear();
        self.clock.take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn is_observing(&self, target: ElementId) -> bool {
        self.target(target).is_some()
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

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect from the next scheduled poll.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[must_use]
    pub fn is_colliding(&self, target: ElementId, other: ElementId) -> bool {
        self.target(target).is_some_and(|t| t.colliding.contains(&other))
    }

    /// Elements `target` currently collides with, in no particular order.
    #[must_use]
    pub fn colliding(&self, target: ElementId) -> Vec<ElementId> {
        self.target(target).map(|t| t.colliding.iter().copied().collect()).unwrap_or_default()
    }

    /// Evaluate every observed pair once and return the transitions.
    ///
    /// Targets are visited in observation order; within a target, changes
    /// follow pattern order, then scene order.
    pub fn poll(&mut self, scope: &impl CollisionScope) -> Vec<CollisionChange> {
        let mut changes = Vec::new();

        for observed in &mut self.targets {
            let target = observed.id;
            let Some(target_rect) = scope.rect(target) else {
                continue;
            };

            let mut seen = HashSet::new();
            let mut candidates = Vec::new();
            for pattern in &observed.patterns {
                for id in scope.matching(pattern) {
                    if id != target && seen.insert(id) {
                        candidates.push(id);
                    }
                }
            }

            for &other in &candidates {
                let hit = scope.rect(other).is_some_and(|rect| intersects(&target_rect, &rect));
                let was = observed.colliding.contains(&other);
                let contact = match (was, hit) {
                    (false, true) => {
                        observed.colliding.insert(other);
                        Contact::Start
                    }
                    (true, false) => {
                        observed.colliding.remove(&other);
                        Contact::End
                    }
                    _ => continue,
                };
                changes.push(CollisionChange { target, other, contact });
            }

            observed.colliding.retain(|id| seen.contains(id));
        }

        changes
    }
}

//! Virtual-time task queue.
//!
//! DESIGN
//! ======
//! Everything in a game runs as scheduled re-entry on one clock: transition
//! ends, collision polls, camera ticks and cache invalidations. Nothing
//! blocks. Tasks due at the same instant run in scheduling order. A task that
//! was canceled never runs, and canceling twice is a no-op, so every owner can
//! drop its timers unconditionally on disposal.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TaskId), T>,
    /// Due time of every pending task, for cancellation by id.
    due: HashMap<TaskId, Duration>,
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { now: Duration::ZERO, next_id: 0, queue: BTreeMap::new(), due: HashMap::new() }
    }

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` at clock time `at`. Times in the past run at `now`.
    pub fn schedule_at(&mut self, at: Duration, task: T) -> TaskId {
        let at = at.max(self.now);
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((at, id), task);
        self.due.insert(id, at);
        id
    }

    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TaskId {
        self.schedule_at(self.now.saturating_add(delay), task)
    }

    /// Cancel a pending task. Returns false when it already ran or was canceled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let Some(at) = self.due.remove(&id) else {
            return false;
        };
        self.queue.remove(&(at, id)).is_some()
    }

    #[must_use]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.due.contains_key(&id)
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.first_key_value().map(|(&(at, _), _)| at)
    }

    /// Remove the earliest task due at or before `until` and move the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskId, T)> {
        let (&(at, id), _) = self.queue.first_key_value()?;
        if at > until {
            return None;
        }
        let task = self.queue.remove(&(at, id))?;
        self.due.remove(&id);
        self.now = self.now.max(at);
        Some((id, task))
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

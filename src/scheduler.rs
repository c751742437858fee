//! Virtual-time timer queue
//!
//! Deadlines are plain millisecond timestamps supplied by the caller, so the
//! browser feeds it `Date.now()` while tests step time by hand.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Timeline<T> {
    next_id: u64,
    // (due, id) keeps same-deadline timers in scheduling order
    queue: BTreeMap<(u64, u64), T>,
    due_by_id: HashMap<u64, u64>,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Timeline {
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Schedule at an absolute deadline; one already in the past fires on
    /// the next drain
    pub fn schedule_at(&mut self, due: u64, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;

        self.queue.insert((due, id), payload);
        self.due_by_id.insert(id, due);

        TimerId(id)
    }

    /// Drop a pending timer, returning its payload if it had not fired yet
    pub fn cancel(&mut self, timer: TimerId) -> Option<T> {
        let due = self.due_by_id.remove(&timer.0)?;
        self.queue.remove(&(due, timer.0))
    }

    /// Remove and return every timer due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: u64) -> Vec<(TimerId, T)> {
        let later = self.queue.split_off(&(now.saturating_add(1), 0));
        let due = std::mem::replace(&mut self.queue, later);

        due.into_iter()
            .map(|((_, id), payload)| {
                self.due_by_id.remove(&id);
                (TimerId(id), payload)
            })
            .collect()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

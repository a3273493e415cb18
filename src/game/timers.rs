//! Timer queue driven by simulation time
//!
//! Entries are popped in due order. Cancelled timers stay in the heap until
//! they surface and are then skipped.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use super::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Periodic enemy spawn
    SpawnEnemy,
    /// Failsafe removal of a bullet
    ExpireBullet(EntityId),
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub due: f64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f64,
    id: TimerId,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    heap: BinaryHeap<Reverse<Scheduled>>,
    live: HashMap<TimerId, TimerKind>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse(Scheduled { due, id }));
        self.live.insert(id, kind);
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Pop the earliest live timer due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<FiredTimer> {
        while let Some(Reverse(next)) = self.heap.peek().copied() {
            if next.due > now {
                return None;
            }
            self.heap.pop();
            if let Some(kind) = self.live.remove(&next.id) {
                return Some(FiredTimer {
                    due: next.due,
                    kind,
                });
            }
        }
        None
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

//! Cancellable deferred tasks tagged with a generation

use serde::{Deserialize, Serialize};

/// Milliseconds on the viewer's monotonic clock
pub type Millis = u64;

/// Identity of a live load or feature subscription.
///
/// Work captured under an older generation is dropped when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due during [`Scheduler::poll`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Due<T> {
    pub id: TaskId,
    pub generation: Generation,
    pub task: T,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TaskId,
    due_at: Millis,
    generation: Generation,
    task: T,
}

/// Timer queue driven by an external clock.
///
/// Nothing fires on its own: the owner calls [`Scheduler::poll`] with the
/// current time and decides what to do with each due task.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(
        &mut self,
        now: Millis,
        delay: Millis,
        generation: Generation,
        task: T,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_at: now.saturating_add(delay),
            generation,
            task,
        });
        id
    }

    /// Cancel one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every task whose generation differs from `live`
    pub fn cancel_stale(&mut self, live: Generation) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.generation == live);
        before - self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return all tasks due at `now`, earliest first.
    /// Tasks due at the same instant come out in scheduling order.
    pub fn poll(&mut self, now: Millis) -> Vec<Due<T>> {
        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].due_at <= now {
                due.push(self.pending.swap_remove(idx));
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|p| (p.due_at, p.id));
        due.into_iter()
            .map(|p| Due {
                id: p.id,
                generation: p.generation,
                task: p.task,
            })
            .collect()
    }

    /// Earliest pending deadline, if any
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//! # Deferred Tasks
//!
//! Notices and button labels revert after a fixed delay. Instead of
//! free-floating timer callbacks, every delayed action is a task owned by a
//! [`Scheduler`]. Scheduling a task whose kind is already pending replaces
//! the pending one, so rescheduling is also cancellation.
//!
//! Time is supplied by the host as [`Millis`]; the scheduler never reads a
//! clock.

/// Host timestamp in milliseconds
pub type Millis = u64;

/// Delayed actions the page layer knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    DismissNotice,
    ResetErrandCopyLabel(usize),
    ResetErrandClearLabel(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask<K> {
    pub kind: K,
    pub due: Millis,
}

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    pending: Vec<ScheduledTask<K>>,
}

impl<K: Copy + PartialEq> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedule `kind` to fire `delay` ms after `now`, replacing any pending
    /// task of the same kind. Returns the due time.
    pub fn schedule(&mut self, kind: K, now: Millis, delay: Millis) -> Millis {
        self.cancel(kind);
        let due = now.saturating_add(delay);
        self.pending.push(ScheduledTask { kind, due });
        due
    }

    /// Returns `true` if a pending task was removed
    pub fn cancel(&mut self, kind: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.kind != kind);
        self.pending.len() != before
    }

    pub fn due(&self, kind: K) -> Option<Millis> {
        self.pending
            .iter()
            .find(|task| task.kind == kind)
            .map(|task| task.due)
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.due(kind).is_some()
    }

    /// Remove and return every task due at or before `now`, earliest first
    pub fn take_due(&mut self, now: Millis) -> Vec<K> {
        let mut fired: Vec<ScheduledTask<K>> = Vec::new();
        self.pending.retain(|task| {
            if task.due <= now {
                fired.push(*task);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|task| task.due);
        fired.into_iter().map(|task| task.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

//! # Session Timers
//!
//! Deadlines owned by one celebration session. Nothing here sleeps or
//! spawns: the engine polls [`TimerSet::pop_due`] from `update()` and the
//! whole set is dropped at once when the session ends.

use std::collections::BTreeMap;

/// Registration handle for a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// What happens when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Emit trailing burst number `burst` (1-based).
    TrailingBurst {
        /// Burst number.
        burst: u32,
    },
    /// Tear the session down and notify the caller.
    Complete,
}

/// A fired timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueTimer {
    /// Registration handle.
    pub id: TimerId,
    /// Deadline (clock milliseconds).
    pub due_ms: u64,
    /// Action to run.
    pub action: TimerAction,
}

/// Pending timers, ordered by `(deadline, registration)`.
#[derive(Debug, Default)]
pub struct TimerSet {
    pending: BTreeMap<(u64, TimerId), TimerAction>,
    next_id: u64,
}

impl TimerSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Arms a timer firing at `due_ms`.
    pub fn arm(&mut self, due_ms: u64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((due_ms, id), action);
        id
    }

    /// Disarms every timer. Timers are never disarmed one at a time.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if no timer is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline, if any.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Removes and returns the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<DueTimer> {
        let (&(due_ms, id), _) = self.pending.first_key_value()?;
        if due_ms > now_ms {
            return None;
        }
        let action = self.pending.remove(&(due_ms, id))?;
        Some(DueTimer { id, due_ms, action })
    }
}

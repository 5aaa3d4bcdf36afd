//! Timing primitives for the single-threaded interaction loop.
//!
//! All trimview components run on one logical (UI) thread. The only deferred
//! work is a long-press timeout and a repeating animation frame request, and
//! both need cancel-before-fire semantics. This module provides:
//! - Monotonic millisecond timestamps
//! - A single-slot deferred task whose tokens are invalidated on re-arm/cancel

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in milliseconds, as delivered by the host input stream.
pub type TimestampMs = u64;

/// Identifies one arming of a [`DeferredSlot`].
///
/// Tokens are never reused within a slot, so a callback carrying an old
/// token can always be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskToken(u64);

impl TaskToken {
    /// Raw generation number (useful for logging).
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A task the host should run at (or after) `deadline_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub token: TaskToken,
    pub deadline_ms: TimestampMs,
}

/// A single-slot cancelable task.
///
/// Arming replaces whatever was pending; cancelling empties the slot. Either
/// way every previously issued token stops matching.
#[derive(Debug, Default)]
pub struct DeferredSlot {
    generation: u64,
    pending: Option<ScheduledTask>,
}

impl DeferredSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot for `deadline_ms`, invalidating any previous token.
    pub fn arm(&mut self, deadline_ms: TimestampMs) -> ScheduledTask {
        self.generation += 1;
        let task = ScheduledTask {
            token: TaskToken(self.generation),
            deadline_ms,
        };
        self.pending = Some(task);
        task
    }

    /// Drop the pending task, if any. Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.pending.take().is_some()
    }

    /// The task currently waiting to fire.
    pub fn pending(&self) -> Option<ScheduledTask> {
        self.pending
    }

    /// Consume the pending task if `token` is the live one.
    ///
    /// Returns false for stale or already-consumed tokens.
    pub fn take(&mut self, token: TaskToken) -> bool {
        match self.pending {
            Some(task) if task.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending task if its deadline has passed at `now_ms`.
    pub fn take_due(&mut self, now_ms: TimestampMs) -> Option<ScheduledTask> {
        match self.pending {
            Some(task) if task.deadline_ms <= now_ms => {
                self.pending = None;
                Some(task)
            }
            _ => None,
        }
    }
}

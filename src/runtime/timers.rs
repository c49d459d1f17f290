//! Timer queue on a virtual clock
//!
//! Single-shot timers scheduled relative to the current virtual time. The
//! clock only moves when the host calls [`TimerQueue::pop_due`] with a later
//! deadline, which keeps debounce behavior deterministic under test.

use crate::commands::TimerId;
use crate::messages::Msg;

#[derive(Debug, Clone)]
struct ScheduledTimer {
    id: TimerId,
    due_ms: u64,
    /// Tie-breaker: timers due at the same instant fire in scheduling order
    seq: u64,
    msg: Msg,
}

/// Pending timers plus the current virtual time
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_seq: u64,
    timers: Vec<ScheduledTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Schedule `msg` for `delay_ms` from now, replacing any timer with the same id
    pub fn schedule(&mut self, id: TimerId, delay_ms: u64, msg: Msg) {
        self.cancel(id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(ScheduledTimer {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            msg,
        });
    }

    /// Cancel a timer; returns false if it was not pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Pop the earliest timer due at or before `until_ms`
    ///
    /// Moves the clock to the popped timer's due time. Returns `None` once
    /// nothing else is due, leaving the clock where it was.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Msg)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)?;
        let timer = self.timers.swap_remove(index);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some((timer.id, timer.msg))
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Due time of the next pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_ms).min()
    }
}

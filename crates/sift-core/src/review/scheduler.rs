//! Deferred write scheduling.
//!
//! A stage change is not written to the provider immediately: it sits in a
//! per-candidate window so rapid corrections (an accidental keypress
//! followed by undo) collapse into a single network call. Each candidate
//! holds at most one pending write; scheduling a new one cancels the old
//! timer outright (last-write-wins).
//!
//! The scheduler holds deadlines, not timers. The owning event loop calls
//! [`WriteScheduler::take_due`] on its tick and dispatches whatever has
//! fired; everything stays deterministic and clock-free for tests.

use crate::stage::Stage;
use std::collections::HashMap;

/// A scheduled stage write that has not fired yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub candidate_id: String,
    pub target_stage: Stage,
    /// Wall-clock deadline in microseconds since the Unix epoch.
    pub fire_at_us: i64,
}

/// Per-candidate debounce window over outbound stage writes.
#[derive(Debug, Clone)]
pub struct WriteScheduler {
    delay_us: i64,
    pending: HashMap<String, PendingWrite>,
}

impl WriteScheduler {
    /// Create a scheduler with the given debounce window.
    #[must_use]
    pub fn new(delay_secs: u64) -> Self {
        let delay_us =
            i64::try_from(delay_secs.saturating_mul(1_000_000)).unwrap_or(i64::MAX);
        Self {
            delay_us,
            pending: HashMap::new(),
        }
    }

    /// Schedule a write for `candidate_id`, replacing any pending one.
    pub fn schedule(&mut self, candidate_id: &str, target_stage: Stage, now_us: i64) {
        self.pending.insert(
            candidate_id.to_string(),
            PendingWrite {
                candidate_id: candidate_id.to_string(),
                target_stage,
                fire_at_us: now_us + self.delay_us,
            },
        );
    }

    /// Cancel the pending write for `candidate_id`, returning it if one
    /// existed. A write that already fired cannot be cancelled, only
    /// corrected by a subsequent write.
    pub fn cancel(&mut self, candidate_id: &str) -> Option<PendingWrite> {
        self.pending.remove(candidate_id)
    }

    /// Drain every write whose deadline has passed, ordered by deadline.
    pub fn take_due(&mut self, now_us: i64) -> Vec<PendingWrite> {
        let due_ids: Vec<String> = self
            .pending
            .values()
            .filter(|w| w.fire_at_us <= now_us)
            .map(|w| w.candidate_id.clone())
            .collect();

        let mut due: Vec<PendingWrite> = due_ids
            .iter()
            .filter_map(|id| self.pending.remove(id))
            .collect();
        due.sort_by(|a, b| {
            a.fire_at_us
                .cmp(&b.fire_at_us)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
        due
    }

    /// Whole seconds until the pending write for `candidate_id` fires
    /// (ceiling), or `None` when nothing is pending.
    #[must_use]
    pub fn remaining_secs(&self, candidate_id: &str, now_us: i64) -> Option<u64> {
        self.pending.get(candidate_id).map(|w| {
            let remaining_us = (w.fire_at_us - now_us).max(0);
            u64::try_from(remaining_us)
                .map(|v| v.div_ceil(1_000_000))
                .unwrap_or(0)
        })
    }

    /// True if `candidate_id` has a write waiting in the window.
    #[must_use]
    pub fn has_pending(&self, candidate_id: &str) -> bool {
        self.pending.contains_key(candidate_id)
    }

    /// True if any candidate has a write waiting.
    #[must_use]
    pub fn any_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: i64 = 1_000_000;

    #[test]
    fn schedule_fires_after_delay() {
        let mut sched = WriteScheduler::new(5);
        sched.schedule("c1", Stage::Interview, 0);

        assert!(sched.take_due(4 * SEC).is_empty());
        let due = sched.take_due(5 * SEC);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].candidate_id, "c1");
        assert_eq!(due[0].target_stage, Stage::Interview);
        assert!(!sched.any_pending());
    }

    #[test]
    fn reschedule_cancels_and_replaces() {
        let mut sched = WriteScheduler::new(5);
        sched.schedule("c1", Stage::Interview, 0);
        sched.schedule("c1", Stage::Rejection, 2 * SEC);

        // The first deadline passes with nothing due: the old timer is gone.
        assert!(sched.take_due(5 * SEC).is_empty());

        let due = sched.take_due(7 * SEC);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].target_stage, Stage::Rejection);
    }

    #[test]
    fn cancel_returns_the_pending_write() {
        let mut sched = WriteScheduler::new(5);
        sched.schedule("c1", Stage::Interview, 0);

        let cancelled = sched.cancel("c1").expect("pending write");
        assert_eq!(cancelled.target_stage, Stage::Interview);
        assert!(sched.cancel("c1").is_none());
        assert!(sched.take_due(10 * SEC).is_empty());
    }

    #[test]
    fn distinct_candidates_fire_independently() {
        let mut sched = WriteScheduler::new(5);
        sched.schedule("c1", Stage::Interview, 0);
        sched.schedule("c2", Stage::Rejection, SEC);

        let due = sched.take_due(5 * SEC);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].candidate_id, "c1");

        let due = sched.take_due(6 * SEC);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].candidate_id, "c2");
    }

    #[test]
    fn due_writes_drain_in_deadline_order() {
        let mut sched = WriteScheduler::new(1);
        sched.schedule("late", Stage::Interview, 3 * SEC);
        sched.schedule("early", Stage::Rejection, 0);

        let due = sched.take_due(10 * SEC);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].candidate_id, "early");
        assert_eq!(due[1].candidate_id, "late");
    }

    #[test]
    fn remaining_secs_is_a_ceiling() {
        let mut sched = WriteScheduler::new(5);
        sched.schedule("c1", Stage::Interview, 0);

        assert_eq!(sched.remaining_secs("c1", 0), Some(5));
        assert_eq!(sched.remaining_secs("c1", SEC / 2), Some(5));
        assert_eq!(sched.remaining_secs("c1", 4 * SEC + 1), Some(1));
        assert_eq!(sched.remaining_secs("c1", 5 * SEC), Some(0));
        assert_eq!(sched.remaining_secs("c1", 6 * SEC), Some(0));
        assert_eq!(sched.remaining_secs("missing", 0), None);
    }
}

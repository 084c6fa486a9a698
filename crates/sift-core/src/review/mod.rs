//! The review state machine.
//!
//! Owns everything the reviewer mutates during a session: the
//! per-candidate stage map, the linear undo/redo history, the hidden set,
//! the single-winner spotlight flag, and the deferred-write window.
//!
//! The machine performs no I/O. Mutations that require a provider round
//! trip return explicit write intents ([`UndoOutcome::remote_fix`],
//! [`FlagToggle::ops`], [`WriteScheduler`] drains) which the presentation
//! layer dispatches; the machine only ever reacts to the resolved outcome
//! (e.g. [`ReviewState::revert_flag`] on a failed flag write).
//!
//! All methods take `now_us` explicitly so behavior is deterministic under
//! test.

pub mod history;
pub mod scheduler;

pub use history::HistoryEntry;
pub use scheduler::{PendingWrite, WriteScheduler};

use crate::session::SessionState;
use crate::stage::Stage;
use std::collections::{HashMap, HashSet};

/// Result of a successful [`ReviewState::undo`].
#[derive(Debug, Clone, PartialEq)]
pub struct UndoOutcome {
    pub candidate_id: String,
    /// The stage restored locally.
    pub restored: Stage,
    /// A corrective write the caller must issue because the forward write
    /// already left the debounce window.
    pub remote_fix: Option<Stage>,
}

/// Result of a successful [`ReviewState::redo`].
#[derive(Debug, Clone, PartialEq)]
pub struct RedoOutcome {
    pub candidate_id: String,
    /// The stage re-applied locally.
    pub applied: Stage,
}

/// One remote flag-field write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOp {
    pub candidate_id: String,
    pub flagged: bool,
}

/// Local flag state captured before an optimistic update, for rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSnapshot {
    previous: Option<String>,
}

/// An optimistic flag toggle: the remote ops to execute, in order, and the
/// snapshot to restore if any of them fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagToggle {
    pub ops: Vec<FlagOp>,
    pub snapshot: FlagSnapshot,
}

/// Per-session review state. See the module docs.
#[derive(Debug, Clone)]
pub struct ReviewState {
    stages: HashMap<String, Stage>,
    history: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    hidden: HashSet<String>,
    flagged: Option<String>,
    scheduler: WriteScheduler,
}

impl ReviewState {
    /// Create an empty machine with the given debounce window.
    #[must_use]
    pub fn new(debounce_secs: u64) -> Self {
        Self {
            stages: HashMap::new(),
            history: Vec::new(),
            redo: Vec::new(),
            hidden: HashSet::new(),
            flagged: None,
            scheduler: WriteScheduler::new(debounce_secs),
        }
    }

    /// Restore a machine from a persisted session.
    #[must_use]
    pub fn from_session(session: SessionState, debounce_secs: u64) -> Self {
        Self {
            stages: session.stages.into_iter().collect(),
            history: session.history,
            redo: session.redo,
            hidden: session.hidden.into_iter().collect(),
            flagged: None,
            scheduler: WriteScheduler::new(debounce_secs),
        }
    }

    /// Snapshot the persisted portion of the state. Pending writes and the
    /// flag winner are deliberately excluded: the timer is an accepted
    /// data-loss boundary, and the flag derives from the remote field.
    #[must_use]
    pub fn to_session(&self, sort_desc: bool) -> SessionState {
        SessionState {
            stages: self
                .stages
                .iter()
                .map(|(id, stage)| (id.clone(), stage.clone()))
                .collect(),
            history: self.history.clone(),
            redo: self.redo.clone(),
            hidden: self.hidden.iter().cloned().collect(),
            sort_desc,
        }
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// Current stage for a candidate; `Review` when nothing is known.
    #[must_use]
    pub fn stage_of(&self, candidate_id: &str) -> Stage {
        self.stages
            .get(candidate_id)
            .cloned()
            .unwrap_or(Stage::Review)
    }

    /// True if the candidate is locally suppressed from the default view.
    #[must_use]
    pub fn is_hidden(&self, candidate_id: &str) -> bool {
        self.hidden.contains(candidate_id)
    }

    /// Current spotlight-flag holder, if any.
    #[must_use]
    pub fn flagged(&self) -> Option<&str> {
        self.flagged.as_deref()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Whole seconds until the candidate's pending write fires, if any.
    #[must_use]
    pub fn pending_secs(&self, candidate_id: &str, now_us: i64) -> Option<u64> {
        self.scheduler.remaining_secs(candidate_id, now_us)
    }

    /// True while any candidate has a write in the debounce window.
    #[must_use]
    pub fn any_pending_write(&self) -> bool {
        self.scheduler.any_pending()
    }

    // -----------------------------------------------------------------------
    // Seeding (programmatic, never user-initiated)
    // -----------------------------------------------------------------------

    /// Seed a candidate's stage from its remote value at load time.
    ///
    /// No history entry and no scheduled write. A candidate that already
    /// has a local stage (restored from a saved session) keeps it.
    /// Remotely rejected candidates are auto-hidden.
    pub fn seed_remote_stage(&mut self, candidate_id: &str, raw: Option<&str>) {
        if self.stages.contains_key(candidate_id) {
            return;
        }
        let stage = Stage::normalize(raw);
        if stage.is_rejection_class() {
            self.hidden.insert(candidate_id.to_string());
        }
        self.stages.insert(candidate_id.to_string(), stage);
    }

    /// Adopt a flag winner observed in remote data, without issuing writes.
    pub fn seed_flag(&mut self, candidate_id: &str) {
        self.flagged = Some(candidate_id.to_string());
    }

    // -----------------------------------------------------------------------
    // Reviewer actions
    // -----------------------------------------------------------------------

    /// Assign a stage. Returns true if the stage actually changed.
    ///
    /// Pushes a history entry, discards the redo future, un-hides the
    /// candidate when the new stage is not rejection-class, and schedules
    /// the deferred remote write (cancel-and-replace).
    pub fn set_stage(&mut self, candidate_id: &str, stage: Stage, now_us: i64) -> bool {
        let old = self.stage_of(candidate_id);
        if old == stage {
            return false;
        }

        self.push_history(HistoryEntry {
            candidate_id: candidate_id.to_string(),
            old_stage: old,
            new_stage: stage.clone(),
            at_us: now_us,
            hidden_delta: false,
        });

        if !stage.is_rejection_class() {
            self.unhide(candidate_id);
        }
        self.stages
            .insert(candidate_id.to_string(), stage.clone());
        self.scheduler.schedule(candidate_id, stage, now_us);
        true
    }

    /// Locally suppress a candidate, tagging it `Rejection`.
    ///
    /// Records one history entry covering both the stage change (if any)
    /// and the hide itself; the hide-flag never goes to the provider, the
    /// stage write fires only when the stage actually changed. Returns
    /// true if anything happened.
    pub fn hide(&mut self, candidate_id: &str, now_us: i64) -> bool {
        let was_hidden = self.hidden.contains(candidate_id);
        let old = self.stage_of(candidate_id);
        let stage_changed = old != Stage::Rejection;

        if was_hidden && !stage_changed {
            return false;
        }

        self.push_history(HistoryEntry {
            candidate_id: candidate_id.to_string(),
            old_stage: old,
            new_stage: Stage::Rejection,
            at_us: now_us,
            hidden_delta: !was_hidden,
        });

        self.stages
            .insert(candidate_id.to_string(), Stage::Rejection);
        self.hidden.insert(candidate_id.to_string());
        if stage_changed {
            self.scheduler
                .schedule(candidate_id, Stage::Rejection, now_us);
        }
        true
    }

    /// Remove a candidate from the hidden set. No history entry; only ever
    /// called as a side effect of history-aware operations or directly by
    /// the presentation layer's show-hidden affordance.
    pub fn unhide(&mut self, candidate_id: &str) {
        self.hidden.remove(candidate_id);
    }

    /// Undo the most recent action, if any.
    ///
    /// Restores the old stage locally and moves the entry to the redo
    /// stack. If the forward write is still in the debounce window it is
    /// cancelled and no remote traffic results; if it already fired, the
    /// outcome carries a corrective write the caller must dispatch.
    pub fn undo(&mut self, _now_us: i64) -> Option<UndoOutcome> {
        let entry = self.history.pop()?;
        let candidate_id = entry.candidate_id.clone();
        let restored = entry.old_stage.clone();

        self.stages
            .insert(candidate_id.clone(), restored.clone());

        let cancelled = self.scheduler.cancel(&candidate_id).is_some();
        let remote_fix = if entry.stage_changed() && !cancelled {
            Some(restored.clone())
        } else {
            None
        };

        if entry.hidden_delta {
            self.unhide(&candidate_id);
        }
        self.redo.push(entry);

        Some(UndoOutcome {
            candidate_id,
            restored,
            remote_fix,
        })
    }

    /// Re-apply the most recently undone action, if any.
    ///
    /// Symmetric inverse of [`ReviewState::undo`]: re-applies the new
    /// stage, re-hides when the original action hid the candidate, and
    /// schedules a fresh debounced write so an immediate follow-up undo
    /// can still cancel cheaply.
    pub fn redo(&mut self, now_us: i64) -> Option<RedoOutcome> {
        let entry = self.redo.pop()?;
        let candidate_id = entry.candidate_id.clone();
        let applied = entry.new_stage.clone();

        self.stages
            .insert(candidate_id.clone(), applied.clone());

        if entry.hidden_delta {
            self.hidden.insert(candidate_id.clone());
        } else if !applied.is_rejection_class() {
            self.unhide(&candidate_id);
        }

        if entry.stage_changed() {
            self.scheduler
                .schedule(&candidate_id, applied.clone(), now_us);
        }
        self.history.push(entry);

        Some(RedoOutcome {
            candidate_id,
            applied,
        })
    }

    /// Toggle the spotlight flag, enforcing the single-winner invariant.
    ///
    /// The local update is optimistic; the returned ops (clear the old
    /// holder, then set the new one) must all succeed remotely. On any
    /// failure, call [`ReviewState::revert_flag`] with the snapshot.
    pub fn toggle_flag(&mut self, candidate_id: &str) -> FlagToggle {
        let snapshot = FlagSnapshot {
            previous: self.flagged.clone(),
        };
        let mut ops = Vec::new();

        if self.flagged.as_deref() == Some(candidate_id) {
            self.flagged = None;
            ops.push(FlagOp {
                candidate_id: candidate_id.to_string(),
                flagged: false,
            });
        } else {
            if let Some(previous) = snapshot.previous.clone() {
                ops.push(FlagOp {
                    candidate_id: previous,
                    flagged: false,
                });
            }
            ops.push(FlagOp {
                candidate_id: candidate_id.to_string(),
                flagged: true,
            });
            self.flagged = Some(candidate_id.to_string());
        }

        FlagToggle { ops, snapshot }
    }

    /// Roll the flag back to its pre-toggle state after a failed write.
    pub fn revert_flag(&mut self, snapshot: FlagSnapshot) {
        self.flagged = snapshot.previous;
    }

    /// Drain stage writes whose debounce window has elapsed.
    pub fn take_due_writes(&mut self, now_us: i64) -> Vec<PendingWrite> {
        self.scheduler.take_due(now_us)
    }

    fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        // A new action forks the timeline; the old future is discarded.
        self.redo.clear();
    }
}

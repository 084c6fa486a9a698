//! Undo/redo history entries.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// One reviewer action on the linear undo/redo timeline.
///
/// `hidden_delta` is true when the action hid the candidate (a `hide`);
/// undoing such an entry un-hides, redoing re-hides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub candidate_id: String,
    pub old_stage: Stage,
    pub new_stage: Stage,
    /// Wall-clock time of the action, microseconds since the Unix epoch.
    pub at_us: i64,
    #[serde(default)]
    pub hidden_delta: bool,
}

impl HistoryEntry {
    /// True if the action changed the stage (hide-only entries do not).
    #[must_use]
    pub fn stage_changed(&self) -> bool {
        self.old_stage != self.new_stage
    }
}

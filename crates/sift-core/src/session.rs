//! Local session persistence.
//!
//! The reviewer's local state (stage assignments, undo/redo stacks, hidden
//! set, sort preference) survives restarts through a JSON file under
//! `.sift/`. The flag winner is deliberately absent: it derives from the
//! remote flag field on the next load. Pending debounce timers are lost on
//! exit by design.

use crate::review::HistoryEntry;
use crate::stage::Stage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// Everything persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub stages: BTreeMap<String, Stage>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub redo: Vec<HistoryEntry>,
    #[serde(default)]
    pub hidden: BTreeSet<String>,
    #[serde(default)]
    pub sort_desc: bool,
}

fn session_path(project_root: &Path) -> PathBuf {
    project_root.join(".sift").join(SESSION_FILE)
}

/// Load the saved session, if one exists.
///
/// A missing file yields `None`; an unreadable or unparsable file is an
/// error so the caller can surface it instead of silently discarding the
/// reviewer's history.
pub fn load_session(project_root: &Path) -> Result<Option<SessionState>> {
    let path = session_path(project_root);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let session = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(session))
}

/// Persist the session, creating `.sift/` if needed.
///
/// Writes to a sibling temp file and renames it into place so a crash
/// mid-write never truncates the previous session.
pub fn save_session(project_root: &Path, session: &SessionState) -> Result<()> {
    let path = session_path(project_root);
    let dir = path.parent().context("session path has no parent")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let content = serde_json::to_string_pretty(session).context("Failed to encode session")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> SessionState {
        SessionState {
            stages: [
                ("rec1".to_string(), Stage::Interview),
                ("rec2".to_string(), Stage::Other("Waitlist".into())),
            ]
            .into_iter()
            .collect(),
            history: vec![HistoryEntry {
                candidate_id: "rec1".into(),
                old_stage: Stage::Review,
                new_stage: Stage::Interview,
                at_us: 7,
                hidden_delta: false,
            }],
            redo: Vec::new(),
            hidden: ["rec3".to_string()].into_iter().collect(),
            sort_desc: true,
        }
    }

    #[test]
    fn round_trips_through_the_session_file() {
        let dir = tempdir().expect("tempdir");
        let session = sample();

        save_session(dir.path(), &session).expect("save");
        let loaded = load_session(dir.path()).expect("load").expect("present");
        assert_eq!(loaded, session);
    }

    #[test]
    fn missing_file_yields_none() {
        let dir = tempdir().expect("tempdir");
        assert!(load_session(dir.path()).expect("load").is_none());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_silent_reset() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".sift")).expect("mkdir");
        std::fs::write(dir.path().join(".sift/session.json"), "{not json").expect("write");

        assert!(load_session(dir.path()).is_err());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let dir = tempdir().expect("tempdir");
        save_session(dir.path(), &sample()).expect("save");

        let mut second = sample();
        second.sort_desc = false;
        second.hidden.clear();
        save_session(dir.path(), &second).expect("save again");

        let loaded = load_session(dir.path()).expect("load").expect("present");
        assert_eq!(loaded, second);
    }

    #[test]
    fn unknown_stage_labels_survive_the_round_trip() {
        let dir = tempdir().expect("tempdir");
        let mut session = SessionState::default();
        session
            .stages
            .insert("rec9".into(), Stage::Other("Stage 3 Scheduled".into()));

        save_session(dir.path(), &session).expect("save");
        let loaded = load_session(dir.path()).expect("load").expect("present");
        assert_eq!(
            loaded.stages.get("rec9"),
            Some(&Stage::Other("Stage 3 Scheduled".into()))
        );
    }
}

//! Background writer thread.
//!
//! Remote writes are fire-and-forget from the state machine's
//! perspective: the input loop hands write intents to a single worker
//! thread and drains outcomes on its tick, so a slow provider never blocks
//! a keypress. Writes to the same candidate are already serialized
//! upstream by the scheduler's cancel-and-replace; distinct candidates may
//! have writes outstanding concurrently from the provider's point of view.
//!
//! Flag toggles are transactional: the ops run in order (clear the old
//! holder, then set the new one) and the first failure aborts the rest so
//! the UI can roll the optimistic update back.

use sift_core::RecordsProvider;
use sift_core::review::{FlagOp, FlagSnapshot};
use sift_core::stage::Stage;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

/// A write intent handed to the worker.
#[derive(Debug)]
pub enum WriteRequest {
    Stage {
        candidate_id: String,
        stage: Stage,
    },
    Flag {
        ops: Vec<FlagOp>,
        snapshot: FlagSnapshot,
    },
    Notes {
        candidate_id: String,
        notes: String,
    },
    Shutdown,
}

/// The resolved outcome of one request.
#[derive(Debug)]
pub enum WriteOutcome {
    StageSynced {
        candidate_id: String,
        stage: Stage,
    },
    StageFailed {
        candidate_id: String,
        detail: String,
    },
    FlagSynced,
    FlagFailed {
        snapshot: FlagSnapshot,
        detail: String,
    },
    NotesSynced {
        candidate_id: String,
    },
    NotesFailed {
        candidate_id: String,
        detail: String,
    },
}

/// Handle to the worker thread: send requests, drain outcomes.
pub struct WriterHandle {
    tx: Sender<WriteRequest>,
    rx: Receiver<WriteOutcome>,
    join: Option<JoinHandle<()>>,
}

impl WriterHandle {
    /// Queue a write. The worker outlives a full queue; a send only fails
    /// if the worker died, which is worth surfacing loudly in logs.
    pub fn send(&self, request: WriteRequest) {
        if let Err(err) = self.tx.send(request) {
            tracing::error!("writer thread is gone; dropping request: {err}");
        }
    }

    /// Collect every outcome the worker has produced so far.
    pub fn drain(&self) -> Vec<WriteOutcome> {
        self.rx.try_iter().collect()
    }

    /// Stop the worker after it finishes queued requests.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(WriteRequest::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawn the writer thread over the given provider.
pub fn spawn(provider: Arc<dyn RecordsProvider + Send + Sync>) -> WriterHandle {
    let (req_tx, req_rx) = channel::<WriteRequest>();
    let (out_tx, out_rx) = channel::<WriteOutcome>();

    let join = std::thread::spawn(move || {
        while let Ok(request) = req_rx.recv() {
            let outcome = match request {
                WriteRequest::Shutdown => break,
                WriteRequest::Stage {
                    candidate_id,
                    stage,
                } => match provider.write_stage(&candidate_id, &stage) {
                    Ok(()) => WriteOutcome::StageSynced {
                        candidate_id,
                        stage,
                    },
                    Err(err) => {
                        tracing::warn!(%candidate_id, "stage write failed: {err}");
                        WriteOutcome::StageFailed {
                            candidate_id,
                            detail: err.to_string(),
                        }
                    }
                },
                WriteRequest::Flag { ops, snapshot } => {
                    let mut failure = None;
                    for op in ops {
                        if let Err(err) = provider.write_flag(&op.candidate_id, op.flagged) {
                            tracing::warn!(
                                candidate_id = %op.candidate_id,
                                "flag write failed: {err}"
                            );
                            failure = Some(err.to_string());
                            break;
                        }
                    }
                    match failure {
                        None => WriteOutcome::FlagSynced,
                        Some(detail) => WriteOutcome::FlagFailed { snapshot, detail },
                    }
                }
                WriteRequest::Notes {
                    candidate_id,
                    notes,
                } => match provider.write_notes(&candidate_id, &notes) {
                    Ok(()) => WriteOutcome::NotesSynced { candidate_id },
                    Err(err) => {
                        tracing::warn!(%candidate_id, "notes write failed: {err}");
                        WriteOutcome::NotesFailed {
                            candidate_id,
                            detail: err.to_string(),
                        }
                    }
                },
            };

            if out_tx.send(outcome).is_err() {
                break;
            }
        }
    });

    WriterHandle {
        tx: req_tx,
        rx: out_rx,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::provider::{ProviderError, RecordsPage};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Provider recording writes; ids listed in `fail` reject flag writes.
    struct RecordingProvider {
        log: Mutex<Vec<String>>,
        fail: Vec<String>,
    }

    impl RecordingProvider {
        fn new(fail: &[&str]) -> Self {
            Self {
                log: Mutex::new(Vec::new()),
                fail: fail.iter().map(ToString::to_string).collect(),
            }
        }
    }

    impl RecordsProvider for RecordingProvider {
        fn fetch_page(
            &self,
            _page_size: usize,
            _cursor: Option<&str>,
        ) -> Result<RecordsPage, ProviderError> {
            Ok(RecordsPage::default())
        }

        fn write_stage(&self, record_id: &str, stage: &Stage) -> Result<(), ProviderError> {
            self.log
                .lock()
                .expect("lock")
                .push(format!("stage:{record_id}:{stage}"));
            Ok(())
        }

        fn write_flag(&self, record_id: &str, flagged: bool) -> Result<(), ProviderError> {
            if self.fail.iter().any(|id| id == record_id) {
                return Err(ProviderError::Write("boom".into()));
            }
            self.log
                .lock()
                .expect("lock")
                .push(format!("flag:{record_id}:{flagged}"));
            Ok(())
        }

        fn write_notes(&self, record_id: &str, _notes: &str) -> Result<(), ProviderError> {
            self.log
                .lock()
                .expect("lock")
                .push(format!("notes:{record_id}"));
            Ok(())
        }
    }

    fn drain_until(handle: &WriterHandle, want: usize) -> Vec<WriteOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.extend(handle.drain());
            if outcomes.len() >= want {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn stage_writes_resolve_with_outcomes() {
        let provider = Arc::new(RecordingProvider::new(&[]));
        let handle = spawn(provider.clone());

        handle.send(WriteRequest::Stage {
            candidate_id: "c1".into(),
            stage: Stage::Interview,
        });

        let outcomes = drain_until(&handle, 1);
        assert!(matches!(
            outcomes.as_slice(),
            [WriteOutcome::StageSynced { candidate_id, .. }] if candidate_id == "c1"
        ));
        assert_eq!(
            provider.log.lock().expect("lock").as_slice(),
            ["stage:c1:Interview"]
        );
        handle.shutdown();
    }

    #[test]
    fn flag_transaction_aborts_on_first_failure() {
        let provider = Arc::new(RecordingProvider::new(&["old"]));
        let handle = spawn(provider.clone());

        let snapshot_probe = {
            // Build a real snapshot through the machine so rollback state
            // travels with the outcome.
            let mut review = sift_core::ReviewState::new(5);
            review.toggle_flag("old");
            review.toggle_flag("new")
        };
        handle.send(WriteRequest::Flag {
            ops: snapshot_probe.ops,
            snapshot: snapshot_probe.snapshot,
        });

        let outcomes = drain_until(&handle, 1);
        assert!(matches!(
            outcomes.as_slice(),
            [WriteOutcome::FlagFailed { .. }]
        ));
        // The set-new write never ran.
        assert!(provider.log.lock().expect("lock").is_empty());
        handle.shutdown();
    }

    #[test]
    fn notes_write_round_trips() {
        let provider = Arc::new(RecordingProvider::new(&[]));
        let handle = spawn(provider.clone());

        handle.send(WriteRequest::Notes {
            candidate_id: "c9".into(),
            notes: "solid".into(),
        });

        let outcomes = drain_until(&handle, 1);
        assert!(matches!(
            outcomes.as_slice(),
            [WriteOutcome::NotesSynced { candidate_id }] if candidate_id == "c9"
        ));
        handle.shutdown();
    }
}

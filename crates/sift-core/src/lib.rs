//! sift-core: the review state machine and its projections.
//!
//! Everything here is synchronous, deterministic, and I/O-free except the
//! session file helpers. The binary crate owns the event loop, the
//! provider client, and the clock; this crate owns the semantics:
//!
//! - [`stage`] — stage vocabulary, normalization, style classes
//! - [`candidate`] / [`store`] — normalized records and the grows-only
//!   session collection
//! - [`review`] — stages, undo/redo, hidden set, flag, deferred writes
//! - [`projection`] / [`navigation`] — derived view model and movement
//! - [`provider`] — the records-provider contract
//! - [`session`] — local persistence of the reviewer's state
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the provider seam, `anyhow::Result`
//!   with context elsewhere.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Time**: callers pass `now_us` (microseconds since the Unix epoch)
//!   explicitly; nothing in this crate reads the clock.

pub mod candidate;
pub mod config;
pub mod error;
pub mod navigation;
pub mod projection;
pub mod provider;
pub mod review;
pub mod session;
pub mod stage;
pub mod store;

pub use candidate::{Candidate, FieldMap};
pub use provider::{ProviderError, RawRecord, RecordsPage, RecordsProvider};
pub use review::ReviewState;
pub use stage::{Stage, StageClass};
pub use store::CandidateStore;

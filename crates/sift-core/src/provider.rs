//! The records-provider seam.
//!
//! The review core never talks to the network directly. It consumes pages
//! of [`RawRecord`]s from a [`RecordsProvider`] and hands write intents
//! back to the caller, which executes them through the same trait. The
//! Airtable implementation lives in the `sift-airtable` crate; tests use
//! in-memory fakes.

use crate::error::ErrorCode;
use crate::stage::Stage;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// One opaque row from the provider: a stable id, a creation timestamp,
/// and a sparse named-field map.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    /// Creation time in microseconds since the Unix epoch.
    pub created_at_us: i64,
    pub fields: BTreeMap<String, JsonValue>,
}

/// One fetched page plus the cursor for the next one.
#[derive(Debug, Clone, Default)]
pub struct RecordsPage {
    pub records: Vec<RawRecord>,
    /// Opaque pagination cursor; `None` means the table is exhausted.
    pub next_cursor: Option<String>,
}

/// Failure taxonomy for provider interactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Credentials missing or unusable. Surfaced as a persistent setup
    /// prompt, not a transient error.
    #[error("provider not configured: {0}")]
    Config(String),

    /// A page fetch failed. Retryable; existing data stays intact.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A field write failed. Logged and surfaced passively; local state
    /// stays authoritative (except the flag, which rolls back).
    #[error("write failed: {0}")]
    Write(String),
}

impl ProviderError {
    /// Map to the stable error-code table.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::NotConfigured,
            Self::Fetch(_) => ErrorCode::FetchFailed,
            Self::Write(_) => ErrorCode::WriteFailed,
        }
    }
}

/// External paginated tabular source of candidate records.
///
/// Reads are paged newest-first by creation time. Writes target a single
/// record's named fields and report success or failure; the core reacts to
/// the resolved outcome and never retries on its own.
pub trait RecordsProvider {
    /// Fetch one page of at most `page_size` records (provider max 100),
    /// sorted by creation time descending.
    fn fetch_page(
        &self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<RecordsPage, ProviderError>;

    /// Write a candidate's stage field.
    fn write_stage(&self, record_id: &str, stage: &Stage) -> Result<(), ProviderError>;

    /// Write a candidate's spotlight-flag field.
    fn write_flag(&self, record_id: &str, flagged: bool) -> Result<(), ProviderError>;

    /// Write a candidate's reviewer-notes field.
    fn write_notes(&self, record_id: &str, notes: &str) -> Result<(), ProviderError>;
}

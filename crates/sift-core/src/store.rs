//! In-memory candidate store.
//!
//! Holds the fetched, normalized candidate records and the pagination
//! cursor. The store preserves provider arrival order and only grows
//! within a session; consumers re-sort by creation time. Ordering and
//! visibility are projection concerns, not store concerns.

use crate::candidate::{Candidate, FieldMap};
use crate::provider::{ProviderError, RecordsProvider};
use std::collections::HashMap;

/// Result of one page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Candidates appended by this load.
    pub appended: usize,
    /// Whether the provider reports more pages behind the cursor.
    pub has_more: bool,
}

/// The grows-only candidate collection for one session.
#[derive(Debug)]
pub struct CandidateStore {
    field_map: FieldMap,
    candidates: Vec<Candidate>,
    index: HashMap<String, usize>,
    next_cursor: Option<String>,
    loaded: bool,
}

impl CandidateStore {
    /// Create an empty store using the given provider-field mapping.
    #[must_use]
    pub fn new(field_map: FieldMap) -> Self {
        Self {
            field_map,
            candidates: Vec::new(),
            index: HashMap::new(),
            next_cursor: None,
            loaded: false,
        }
    }

    /// Fetch the first page, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the underlying fetch fails; the
    /// caller decides whether to retry. Existing contents are untouched on
    /// failure.
    pub fn load(
        &mut self,
        provider: &dyn RecordsProvider,
        page_size: usize,
    ) -> Result<LoadOutcome, ProviderError> {
        let page = provider.fetch_page(page_size, None)?;

        self.candidates.clear();
        self.index.clear();
        let appended = self.absorb(page.records);
        self.next_cursor = page.next_cursor;
        self.loaded = true;
        tracing::debug!(appended, has_more = self.next_cursor.is_some(), "initial page loaded");

        Ok(LoadOutcome {
            appended,
            has_more: self.next_cursor.is_some(),
        })
    }

    /// Fetch the next page behind the stored cursor and append it.
    ///
    /// A no-op when the table is already exhausted. On failure the
    /// existing data and cursor are left intact so the caller can retry
    /// just the load-more.
    pub fn load_more(
        &mut self,
        provider: &dyn RecordsProvider,
        page_size: usize,
    ) -> Result<LoadOutcome, ProviderError> {
        let Some(cursor) = self.next_cursor.clone() else {
            return Ok(LoadOutcome {
                appended: 0,
                has_more: false,
            });
        };

        let page = provider.fetch_page(page_size, Some(&cursor))?;
        let appended = self.absorb(page.records);
        self.next_cursor = page.next_cursor;
        tracing::debug!(appended, has_more = self.next_cursor.is_some(), "page appended");

        Ok(LoadOutcome {
            appended,
            has_more: self.next_cursor.is_some(),
        })
    }

    fn absorb(&mut self, records: Vec<crate::provider::RawRecord>) -> usize {
        let mut appended = 0;
        for record in &records {
            if self.index.contains_key(&record.id) {
                continue;
            }
            let candidate = Candidate::from_raw(record, &self.field_map);
            self.index
                .insert(candidate.id.clone(), self.candidates.len());
            self.candidates.push(candidate);
            appended += 1;
        }
        appended
    }

    /// All candidates in provider arrival order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up one candidate by provider id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.index.get(id).map(|&i| &self.candidates[i])
    }

    /// Whether an initial load has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the provider reports more pages behind the cursor.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Update a candidate's local notes text. Returns false for unknown
    /// ids. The caller is responsible for dispatching the provider write.
    pub fn set_notes(&mut self, id: &str, notes: &str) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        self.candidates[i].notes = notes.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawRecord, RecordsPage};
    use crate::stage::Stage;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    /// In-memory provider serving a fixed page sequence.
    struct StubProvider {
        pages: RefCell<Vec<Result<RecordsPage, ProviderError>>>,
        fetches: Cell<usize>,
    }

    impl StubProvider {
        fn new(pages: Vec<Result<RecordsPage, ProviderError>>) -> Self {
            Self {
                pages: RefCell::new(pages),
                fetches: Cell::new(0),
            }
        }
    }

    impl RecordsProvider for StubProvider {
        fn fetch_page(
            &self,
            _page_size: usize,
            _cursor: Option<&str>,
        ) -> Result<RecordsPage, ProviderError> {
            self.fetches.set(self.fetches.get() + 1);
            let mut pages = self.pages.borrow_mut();
            if pages.is_empty() {
                return Ok(RecordsPage::default());
            }
            pages.remove(0)
        }

        fn write_stage(&self, _: &str, _: &Stage) -> Result<(), ProviderError> {
            Ok(())
        }

        fn write_flag(&self, _: &str, _: bool) -> Result<(), ProviderError> {
            Ok(())
        }

        fn write_notes(&self, _: &str, _: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    fn record(id: &str, created_at_us: i64) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            created_at_us,
            fields: [("First".to_string(), json!("A"))].into_iter().collect(),
        }
    }

    fn field_map() -> FieldMap {
        FieldMap::from_entries([("First", "first_name")])
    }

    fn page(ids: &[(&str, i64)], cursor: Option<&str>) -> RecordsPage {
        RecordsPage {
            records: ids.iter().map(|(id, ts)| record(id, *ts)).collect(),
            next_cursor: cursor.map(String::from),
        }
    }

    #[test]
    fn first_load_replaces_and_reports_cursor() {
        let provider = StubProvider::new(vec![Ok(page(
            &[("rec1", 10), ("rec2", 20)],
            Some("cursor-a"),
        ))]);
        let mut store = CandidateStore::new(field_map());

        let outcome = store.load(&provider, 100).expect("load");
        assert_eq!(outcome.appended, 2);
        assert!(outcome.has_more);
        assert_eq!(store.len(), 2);
        assert!(store.is_loaded());
        assert!(store.get("rec1").is_some());
    }

    #[test]
    fn load_more_appends_behind_cursor() {
        let provider = StubProvider::new(vec![
            Ok(page(&[("rec1", 10)], Some("cursor-a"))),
            Ok(page(&[("rec2", 20)], None)),
        ]);
        let mut store = CandidateStore::new(field_map());

        store.load(&provider, 100).expect("load");
        let outcome = store.load_more(&provider, 100).expect("load more");
        assert_eq!(outcome.appended, 1);
        assert!(!outcome.has_more);
        assert_eq!(store.len(), 2);
        // Arrival order preserved.
        assert_eq!(store.candidates()[0].id, "rec1");
        assert_eq!(store.candidates()[1].id, "rec2");
    }

    #[test]
    fn load_more_without_cursor_is_a_noop() {
        let provider = StubProvider::new(vec![Ok(page(&[("rec1", 10)], None))]);
        let mut store = CandidateStore::new(field_map());

        store.load(&provider, 100).expect("load");
        let outcome = store.load_more(&provider, 100).expect("noop");
        assert_eq!(outcome.appended, 0);
        assert_eq!(provider.fetches.get(), 1);
    }

    #[test]
    fn duplicate_ids_are_not_appended_twice() {
        let provider = StubProvider::new(vec![
            Ok(page(&[("rec1", 10)], Some("cursor-a"))),
            Ok(page(&[("rec1", 10), ("rec2", 20)], None)),
        ]);
        let mut store = CandidateStore::new(field_map());

        store.load(&provider, 100).expect("load");
        let outcome = store.load_more(&provider, 100).expect("load more");
        assert_eq!(outcome.appended, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_load_more_keeps_existing_data_and_cursor() {
        let provider = StubProvider::new(vec![
            Ok(page(&[("rec1", 10)], Some("cursor-a"))),
            Err(ProviderError::Fetch("503".into())),
            Ok(page(&[("rec2", 20)], None)),
        ]);
        let mut store = CandidateStore::new(field_map());

        store.load(&provider, 100).expect("load");
        assert!(store.load_more(&provider, 100).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.has_more());

        // Retry succeeds with the same cursor.
        let outcome = store.load_more(&provider, 100).expect("retry");
        assert_eq!(outcome.appended, 1);
    }

    #[test]
    fn set_notes_updates_known_candidates_only() {
        let provider = StubProvider::new(vec![Ok(page(&[("rec1", 10)], None))]);
        let mut store = CandidateStore::new(field_map());
        store.load(&provider, 100).expect("load");

        assert!(store.set_notes("rec1", "strong applicant"));
        assert_eq!(store.get("rec1").map(|c| c.notes.as_str()), Some("strong applicant"));
        assert!(!store.set_notes("recX", "nope"));
    }
}

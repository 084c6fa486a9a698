//! List projection.
//!
//! Derives the ordered, filtered, annotated view model from the candidate
//! store plus the review state. Pure: recomputed on demand, no caching, no
//! mutation.

use crate::review::ReviewState;
use crate::stage::{Stage, StageClass};
use crate::store::CandidateStore;

/// Options controlling the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Newest candidates first when true.
    pub sort_desc: bool,
}

/// One row of the derived view model.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateView {
    pub id: String,
    pub name: String,
    pub company: String,
    pub score: u8,
    pub stage: Stage,
    pub stage_class: StageClass,
    /// Locally suppressed from the default view.
    pub hidden: bool,
    /// Current spotlight-flag holder.
    pub flagged: bool,
    /// Whole seconds until the deferred stage write fires, if one is
    /// outstanding for this candidate.
    pub pending_secs: Option<u64>,
    pub created_at_us: i64,
    /// Provider arrival index, the stable sort tie-break.
    pub arrival: usize,
}

/// Per-stage tallies across the whole store (hidden included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub review: usize,
    pub interview: usize,
    pub rejection: usize,
    pub other: usize,
}

/// The derived view model: visible and hidden partitions, both in the
/// active sort order, plus stage tallies.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub visible: Vec<CandidateView>,
    pub hidden: Vec<CandidateView>,
    pub counts: StageCounts,
}

/// Project the combined state into the view model.
///
/// Sort key is creation time (ascending or descending per the options);
/// ties break stably on provider arrival order. A candidate lands in
/// `hidden` iff its id is in the hidden set; it still exists there for
/// optional display, it is only collapsed out of `visible`.
#[must_use]
pub fn project(
    store: &CandidateStore,
    review: &ReviewState,
    options: ProjectionOptions,
    now_us: i64,
) -> Projection {
    let mut rows: Vec<CandidateView> = store
        .candidates()
        .iter()
        .enumerate()
        .map(|(arrival, candidate)| {
            let stage = review.stage_of(&candidate.id);
            let stage_class = StageClass::of(stage.label());
            CandidateView {
                id: candidate.id.clone(),
                name: candidate.display_name(),
                company: candidate.company.clone(),
                score: candidate.score,
                stage_class,
                hidden: review.is_hidden(&candidate.id),
                flagged: review.flagged() == Some(candidate.id.as_str()),
                pending_secs: review.pending_secs(&candidate.id, now_us),
                created_at_us: candidate.created_at_us,
                arrival,
                stage,
            }
        })
        .collect();

    // Stable sort: arrival order survives as the tie-break.
    if options.sort_desc {
        rows.sort_by(|a, b| b.created_at_us.cmp(&a.created_at_us));
    } else {
        rows.sort_by(|a, b| a.created_at_us.cmp(&b.created_at_us));
    }

    let mut counts = StageCounts::default();
    for row in &rows {
        match row.stage {
            Stage::Review => counts.review += 1,
            Stage::Interview => counts.interview += 1,
            Stage::Rejection => counts.rejection += 1,
            Stage::Other(_) => counts.other += 1,
        }
    }

    let (hidden, visible) = rows.into_iter().partition(|row| row.hidden);
    Projection {
        visible,
        hidden,
        counts,
    }
}

/// True if `a` sorts strictly after `b` in the active order.
///
/// Used to find "the next candidate after" a reference row without
/// materializing a merged visible+hidden list.
#[must_use]
pub fn sorts_after(a: &CandidateView, b: &CandidateView, sort_desc: bool) -> bool {
    if a.created_at_us == b.created_at_us {
        return a.arrival > b.arrival;
    }
    if sort_desc {
        a.created_at_us < b.created_at_us
    } else {
        a.created_at_us > b.created_at_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::FieldMap;
    use crate::provider::{ProviderError, RawRecord, RecordsPage, RecordsProvider};
    use serde_json::json;

    struct OnePage(Vec<RawRecord>);

    impl RecordsProvider for OnePage {
        fn fetch_page(
            &self,
            _page_size: usize,
            _cursor: Option<&str>,
        ) -> Result<RecordsPage, ProviderError> {
            Ok(RecordsPage {
                records: self.0.clone(),
                next_cursor: None,
            })
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

    fn record(id: &str, created_at_us: i64, first: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            created_at_us,
            fields: [
                ("First".to_string(), json!(first)),
                ("AI Score".to_string(), json!(70)),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn store_with(records: Vec<RawRecord>) -> CandidateStore {
        let mut store = CandidateStore::new(FieldMap::from_entries([
            ("First", "first_name"),
            ("AI Score", "score"),
        ]));
        store.load(&OnePage(records), 100).expect("load");
        store
    }

    fn seeded_review(store: &CandidateStore) -> ReviewState {
        let mut review = ReviewState::new(5);
        for candidate in store.candidates() {
            review.seed_remote_stage(&candidate.id, candidate.remote_stage.as_deref());
        }
        review
    }

    const DESC: ProjectionOptions = ProjectionOptions { sort_desc: true };
    const ASC: ProjectionOptions = ProjectionOptions { sort_desc: false };

    #[test]
    fn sorts_by_created_time_with_direction() {
        let store = store_with(vec![
            record("old", 10, "Old"),
            record("new", 30, "New"),
            record("mid", 20, "Mid"),
        ]);
        let review = seeded_review(&store);

        let proj = project(&store, &review, DESC, 0);
        let ids: Vec<&str> = proj.visible.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);

        let proj = project(&store, &review, ASC, 0);
        let ids: Vec<&str> = proj.visible.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["old", "mid", "new"]);
    }

    #[test]
    fn equal_timestamps_break_ties_on_arrival_order() {
        let store = store_with(vec![
            record("a", 10, "A"),
            record("b", 10, "B"),
            record("c", 10, "C"),
        ]);
        let review = seeded_review(&store);

        for options in [DESC, ASC] {
            let proj = project(&store, &review, options, 0);
            let ids: Vec<&str> = proj.visible.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(ids, ["a", "b", "c"]);
        }
    }

    #[test]
    fn hidden_candidates_partition_out_of_visible() {
        let store = store_with(vec![record("a", 10, "A"), record("b", 20, "B")]);
        let mut review = seeded_review(&store);
        review.hide("a", 0);

        let proj = project(&store, &review, DESC, 0);
        assert_eq!(proj.visible.len(), 1);
        assert_eq!(proj.visible[0].id, "b");
        assert_eq!(proj.hidden.len(), 1);
        assert_eq!(proj.hidden[0].id, "a");
        assert!(proj.hidden[0].hidden);
    }

    #[test]
    fn counts_cover_hidden_candidates_too() {
        let store = store_with(vec![
            record("a", 10, "A"),
            record("b", 20, "B"),
            record("c", 30, "C"),
        ]);
        let mut review = seeded_review(&store);
        review.set_stage("b", Stage::Interview, 0);
        review.hide("c", 0);

        let proj = project(&store, &review, DESC, 0);
        assert_eq!(proj.counts.review, 1);
        assert_eq!(proj.counts.interview, 1);
        assert_eq!(proj.counts.rejection, 1);
        assert_eq!(proj.counts.other, 0);
    }

    #[test]
    fn rows_carry_stage_class_flag_and_countdown() {
        let store = store_with(vec![record("a", 10, "A"), record("b", 20, "B")]);
        let mut review = seeded_review(&store);
        review.set_stage("a", Stage::Interview, 0);
        review.toggle_flag("b");

        let proj = project(&store, &review, ASC, 1_000_000);
        let a = &proj.visible[0];
        assert_eq!(a.stage_class, StageClass::Interview);
        assert_eq!(a.pending_secs, Some(4));
        assert!(!a.flagged);
        let b = &proj.visible[1];
        assert!(b.flagged);
        assert_eq!(b.pending_secs, None);
        assert_eq!(b.score, 70);
    }

    #[test]
    fn sorts_after_follows_the_active_direction() {
        let store = store_with(vec![record("a", 10, "A"), record("b", 20, "B")]);
        let review = seeded_review(&store);
        let proj = project(&store, &review, DESC, 0);
        let (newer, older) = (&proj.visible[0], &proj.visible[1]);

        assert!(sorts_after(older, newer, true));
        assert!(!sorts_after(newer, older, true));
        assert!(sorts_after(newer, older, false));
    }
}

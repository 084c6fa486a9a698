//! Navigation policy.
//!
//! Computes "next candidate to review" and adjacent stepping over the
//! projected row order. Pure functions over [`CandidateView`] slices: the
//! presentation layer passes whatever order it is currently displaying.

use crate::projection::{CandidateView, Projection, sorts_after};
use crate::stage::Stage;

/// Nearest candidate still awaiting triage, scanning forward from the
/// current position and wrapping past the end.
///
/// Falls back to the nearest candidate in forward order (ignoring stage)
/// when nothing is left to triage. Returns `None` when the list is empty
/// or there is nowhere to move (the current candidate is the only one).
#[must_use]
pub fn next_untriaged(order: &[CandidateView], current: Option<&str>) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    let start = current
        .and_then(|id| order.iter().position(|row| row.id == id))
        .map_or(0, |i| i + 1);
    let len = order.len();

    let mut fallback = None;
    for step in 0..len {
        let row = &order[(start + step) % len];
        if current == Some(row.id.as_str()) {
            continue;
        }
        if row.stage == Stage::Review {
            return Some(row.id.clone());
        }
        if fallback.is_none() {
            fallback = Some(row.id.clone());
        }
    }
    fallback
}

/// Step one position in the displayed order, wrapping at both ends.
///
/// With no current selection, `+1` lands on the first row and `-1` on the
/// last.
#[must_use]
pub fn adjacent(order: &[CandidateView], current: Option<&str>, direction: i32) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    let len = order.len();
    let position = current.and_then(|id| order.iter().position(|row| row.id == id));

    let target = match position {
        Some(i) if direction >= 0 => (i + 1) % len,
        Some(i) => i.checked_sub(1).unwrap_or(len - 1),
        None if direction >= 0 => 0,
        None => len - 1,
    };
    Some(order[target].id.clone())
}

/// The spotlight-migration contract.
///
/// The flag should move to the current candidate when the flag holder is
/// hidden or no longer awaiting triage AND the current candidate is
/// exactly the next visible one after the holder in the active sort
/// order. Keeps the spotlight attached to "the next person up for
/// review".
#[must_use]
pub fn flag_should_move(projection: &Projection, sort_desc: bool, current: &str) -> bool {
    let holder = projection
        .visible
        .iter()
        .chain(projection.hidden.iter())
        .find(|row| row.flagged);
    let Some(holder) = holder else {
        return false;
    };
    if holder.id == current {
        return false;
    }

    let advanced_past = holder.hidden || holder.stage != Stage::Review;
    if !advanced_past {
        return false;
    }

    projection
        .visible
        .iter()
        .find(|row| sorts_after(row, holder, sort_desc))
        .is_some_and(|row| row.id == current)
}

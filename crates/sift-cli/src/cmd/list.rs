//! `sift list` — print one projected page of candidates.

use crate::output::{CliError, OutputMode, render, render_error};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sift_airtable::{AirtableProvider, standard_field_map};
use sift_core::config::load_project_config;
use sift_core::projection::{ProjectionOptions, project};
use sift_core::{CandidateStore, ReviewState, session};
use std::io::Write;
use std::path::Path;

/// Arguments for `sift list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Records to fetch (provider caps pages at 100).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Include locally hidden candidates.
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Debug, Serialize)]
struct ListRow {
    id: String,
    name: String,
    company: String,
    score: u8,
    stage: String,
    hidden: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    rows: Vec<ListRow>,
    review: usize,
    interview: usize,
    rejection: usize,
    has_more: bool,
}

/// Execute `sift list`.
pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;

    let provider = match AirtableProvider::from_env() {
        Ok(provider) => provider,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("provider not configured");
        }
    };

    let page_size = args
        .limit
        .unwrap_or_else(|| config.provider.effective_page_size());
    let mut store = CandidateStore::new(standard_field_map());
    if let Err(err) = store.load(&provider, page_size) {
        render_error(output, &CliError::from(&err))?;
        anyhow::bail!("fetch failed");
    }

    // Local stages and the sort preference from a saved review session
    // apply to the listing too.
    let saved = session::load_session(project_root)?;
    let sort_desc = saved
        .as_ref()
        .map_or(config.review.sort_desc, |s| s.sort_desc);
    let mut review = saved.map_or_else(
        || ReviewState::new(config.review.debounce_secs),
        |s| ReviewState::from_session(s, config.review.debounce_secs),
    );
    for candidate in store.candidates() {
        review.seed_remote_stage(&candidate.id, candidate.remote_stage.as_deref());
    }

    let now_us = chrono::Utc::now().timestamp_micros();
    let projection = project(&store, &review, ProjectionOptions { sort_desc }, now_us);

    let mut rows: Vec<ListRow> = projection
        .visible
        .iter()
        .map(|row| ListRow {
            id: row.id.clone(),
            name: row.name.clone(),
            company: row.company.clone(),
            score: row.score,
            stage: row.stage.label().to_string(),
            hidden: false,
        })
        .collect();
    if args.hidden {
        rows.extend(projection.hidden.iter().map(|row| ListRow {
            id: row.id.clone(),
            name: row.name.clone(),
            company: row.company.clone(),
            score: row.score,
            stage: row.stage.label().to_string(),
            hidden: true,
        }));
    }

    let payload = ListOutput {
        rows,
        review: projection.counts.review,
        interview: projection.counts.interview,
        rejection: projection.counts.rejection,
        has_more: store.has_more(),
    };

    render(output, &payload, |list, w| render_list_human(list, w))
}

fn render_list_human(list: &ListOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{:<18} {:<24} {:<24} {:>5}  {}",
        "ID", "NAME", "PROJECT", "SCORE", "STAGE"
    )?;
    for row in &list.rows {
        writeln!(
            w,
            "{:<18} {:<24} {:<24} {:>5}  {}{}",
            row.id,
            truncate(&row.name, 24),
            truncate(&row.company, 24),
            row.score,
            row.stage,
            if row.hidden { " (hidden)" } else { "" }
        )?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "{} review / {} interview / {} rejected{}",
        list.review,
        list.interview,
        list.rejection,
        if list.has_more { " — more available" } else { "" }
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("ábcdefgh", 5), "ábcd…");
    }
}

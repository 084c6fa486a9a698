//! The review screen.
//!
//! Left pane: candidate list in the active sort order, stage-styled, with
//! score badges, the spotlight flag, and per-candidate countdowns while a
//! deferred write is pending. Right pane: the selected application's
//! detail sections. Bottom: key hints, stage tallies, and transient
//! status messages.
//!
//! Key bindings: j/k step, n next untriaged, i interview, p review,
//! x reject, h hide, H show/hide hidden, f flag, N notes, z undo, Z redo,
//! s sort, m load more, r retry, q quit.

use crate::writer::{self, WriteOutcome, WriteRequest, WriterHandle};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use sift_core::config::load_project_config;
use sift_core::navigation;
use sift_core::projection::{CandidateView, Projection, ProjectionOptions, project};
use sift_core::session;
use sift_core::stage::{Stage, StageClass};
use sift_core::store::CandidateStore;
use sift_core::{Candidate, RecordsProvider, ReviewState};
use sift_airtable::standard_field_map;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Detail sections in display order: internal answer key plus heading.
const DETAIL_SECTIONS: &[(&str, &str)] = &[
    ("school_or_work", "School or Work"),
    ("project_description", "Project Description"),
    ("problem_solving", "Problem Solving"),
    ("expertise", "Expertise"),
    ("competitors", "Competitors & Understanding"),
    ("past_work", "Past Work"),
    ("nerdy", "What's Nerdy About You"),
    ("drives", "What Drives You"),
    ("non_traditional", "Non-Traditional Background"),
    ("risk_or_challenge", "Risk or Challenge"),
    ("achievements", "Achievements"),
    ("cofounder", "Dream Co-founder"),
    ("how_heard", "How They Heard About Us"),
    ("help_needed", "Help Needed"),
];

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    /// Notes modal is open.
    Notes,
}

// ---------------------------------------------------------------------------
// Notes modal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteAction {
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
struct NoteModalState {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl NoteModalState {
    fn from_text(text: &str) -> Self {
        let lines: Vec<String> = if text.is_empty() {
            vec![String::new()]
        } else {
            text.lines().map(ToString::to_string).collect()
        };
        let row = lines.len() - 1;
        let col = char_len(&lines[row]);
        Self { lines, row, col }
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn handle_key(&mut self, key: KeyEvent) -> NoteAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => NoteAction::Cancel,
            KeyCode::Char('s') | KeyCode::Enter if ctrl => NoteAction::Submit,
            _ => {
                edit_multiline(&mut self.lines, &mut self.row, &mut self.col, key);
                NoteAction::None
            }
        }
    }
}

fn edit_multiline(lines: &mut Vec<String>, row: &mut usize, col: &mut usize, key: KeyEvent) {
    if lines.is_empty() {
        lines.push(String::new());
    }
    match key.code {
        KeyCode::Left => {
            if *col > 0 {
                *col -= 1;
            } else if *row > 0 {
                *row -= 1;
                *col = char_len(&lines[*row]);
            }
        }
        KeyCode::Right => {
            if *col < char_len(&lines[*row]) {
                *col += 1;
            } else if *row + 1 < lines.len() {
                *row += 1;
                *col = 0;
            }
        }
        KeyCode::Up => {
            if *row > 0 {
                *row -= 1;
                *col = (*col).min(char_len(&lines[*row]));
            }
        }
        KeyCode::Down => {
            if *row + 1 < lines.len() {
                *row += 1;
                *col = (*col).min(char_len(&lines[*row]));
            }
        }
        KeyCode::Home => *col = 0,
        KeyCode::End => *col = char_len(&lines[*row]),
        KeyCode::Enter => {
            let split_at = byte_index_at_char(&lines[*row], *col);
            let tail = lines[*row].split_off(split_at);
            *row += 1;
            *col = 0;
            lines.insert(*row, tail);
        }
        KeyCode::Backspace => {
            if *col > 0 {
                remove_char_at(&mut lines[*row], *col - 1);
                *col -= 1;
            } else if *row > 0 {
                let current = lines.remove(*row);
                *row -= 1;
                *col = char_len(&lines[*row]);
                lines[*row].push_str(&current);
            }
        }
        KeyCode::Delete => {
            if *col < char_len(&lines[*row]) {
                remove_char_at(&mut lines[*row], *col);
            } else if *row + 1 < lines.len() {
                let next = lines.remove(*row + 1);
                lines[*row].push_str(&next);
            }
        }
        KeyCode::Char(c) => {
            let idx = byte_index_at_char(&lines[*row], *col);
            lines[*row].insert(idx, c);
            *col += 1;
        }
        _ => {}
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Main application state for the review screen.
pub struct ReviewApp {
    project_root: PathBuf,
    provider: Arc<dyn RecordsProvider + Send + Sync>,
    store: CandidateStore,
    review: ReviewState,
    writer: Option<WriterHandle>,
    page_size: usize,
    /// Newest candidates first when true.
    sort_desc: bool,
    /// Whether hidden candidates are appended to the list.
    show_hidden: bool,
    /// Currently selected candidate id.
    selected: Option<String>,
    input_mode: InputMode,
    note_modal: Option<NoteModalState>,
    /// Transient status message with its display start time.
    status_msg: Option<(String, Instant)>,
    /// Set when the initial load failed; blocks the view behind a retry.
    load_error: Option<String>,
    /// Set when a load-more failed; only that control is marked.
    load_more_failed: bool,
    detail_scroll: u16,
    should_quit: bool,
}

impl ReviewApp {
    /// Build the app and perform the initial load.
    ///
    /// A failed initial fetch does not abort: the view opens in a blocked
    /// error state with a retry affordance, matching the config-vs-network
    /// split in the error design.
    pub fn new(
        provider: Arc<dyn RecordsProvider + Send + Sync>,
        project_root: &Path,
    ) -> Result<Self> {
        let config = load_project_config(project_root)?;
        let saved = session::load_session(project_root)?;
        let sort_desc = saved
            .as_ref()
            .map_or(config.review.sort_desc, |s| s.sort_desc);
        let review = saved.map_or_else(
            || ReviewState::new(config.review.debounce_secs),
            |s| ReviewState::from_session(s, config.review.debounce_secs),
        );

        let mut app = Self {
            project_root: project_root.to_path_buf(),
            writer: Some(writer::spawn(provider.clone())),
            provider,
            store: CandidateStore::new(standard_field_map()),
            review,
            page_size: config.provider.effective_page_size(),
            sort_desc,
            show_hidden: config.review.show_hidden,
            selected: None,
            input_mode: InputMode::default(),
            note_modal: None,
            status_msg: None,
            load_error: None,
            load_more_failed: false,
            detail_scroll: 0,
            should_quit: false,
        };
        app.initial_load();
        Ok(app)
    }

    /// Fetch (or re-fetch) the first page and seed the review state.
    fn initial_load(&mut self) {
        match self.store.load(self.provider.as_ref(), self.page_size) {
            Ok(outcome) => {
                self.load_error = None;
                self.seed_from_store();
                tracing::info!(appended = outcome.appended, "initial load complete");
                if self.selected.is_none() {
                    let projection = self.projection(0);
                    self.selected = navigation::next_untriaged(&projection.visible, None)
                        .or_else(|| projection.visible.first().map(|row| row.id.clone()));
                }
            }
            Err(err) => {
                tracing::warn!("initial load failed: {err}");
                self.load_error = Some(err.to_string());
            }
        }
    }

    /// Seed stages and the flag winner from remote data. Session-restored
    /// local stages win over remote values; remotely rejected candidates
    /// are auto-hidden.
    fn seed_from_store(&mut self) {
        let seeds: Vec<(String, Option<String>, bool)> = self
            .store
            .candidates()
            .iter()
            .map(|c: &Candidate| (c.id.clone(), c.remote_stage.clone(), c.flag))
            .collect();
        for (id, remote_stage, flag) in seeds {
            self.review.seed_remote_stage(&id, remote_stage.as_deref());
            if flag && self.review.flagged().is_none() {
                self.review.seed_flag(&id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    fn projection(&self, now_us: i64) -> Projection {
        project(
            &self.store,
            &self.review,
            ProjectionOptions {
                sort_desc: self.sort_desc,
            },
            now_us,
        )
    }

    /// Rows currently shown in the list: visible, plus hidden when toggled.
    fn displayed(&self, projection: &Projection) -> Vec<CandidateView> {
        let mut rows = projection.visible.clone();
        if self.show_hidden {
            rows.extend(projection.hidden.iter().cloned());
        }
        rows
    }

    fn ensure_selection(&mut self, rows: &[CandidateView]) {
        let still_there = self
            .selected
            .as_ref()
            .is_some_and(|id| rows.iter().any(|row| &row.id == id));
        if !still_there {
            self.selected = rows.first().map(|row| row.id.clone());
        }
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    fn save(&self) {
        if let Err(err) =
            session::save_session(&self.project_root, &self.review.to_session(self.sort_desc))
        {
            tracing::warn!("failed to save session: {err}");
        }
    }

    fn writer_send(&self, request: WriteRequest) {
        if let Some(writer) = &self.writer {
            writer.send(request);
        }
    }

    /// Shut the writer down, letting queued writes finish.
    pub fn finish(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.shutdown();
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Dispatch writes whose debounce window elapsed and absorb resolved
    /// outcomes. Pure countdown refresh otherwise; never mutates triage
    /// state except for the flag rollback on a failed flag write.
    pub fn tick(&mut self, now_us: i64) {
        for write in self.review.take_due_writes(now_us) {
            self.writer_send(WriteRequest::Stage {
                candidate_id: write.candidate_id,
                stage: write.target_stage,
            });
        }

        let outcomes = self
            .writer
            .as_ref()
            .map(WriterHandle::drain)
            .unwrap_or_default();
        for outcome in outcomes {
            match outcome {
                WriteOutcome::StageSynced { .. } | WriteOutcome::FlagSynced => {}
                WriteOutcome::StageFailed {
                    candidate_id,
                    detail,
                } => {
                    self.set_status(format!("Stage sync failed for {candidate_id}: {detail}"));
                }
                WriteOutcome::FlagFailed { snapshot, detail } => {
                    self.review.revert_flag(snapshot);
                    self.set_status(format!("Flag sync failed, reverted: {detail}"));
                }
                WriteOutcome::NotesSynced { .. } => self.set_status("Notes saved".to_string()),
                WriteOutcome::NotesFailed { detail, .. } => {
                    self.set_status(format!("Notes save failed: {detail}"));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent, now_us: i64) -> Result<()> {
        match self.input_mode {
            InputMode::Notes => self.handle_notes_key(key),
            InputMode::Normal => self.handle_normal_key(key, now_us),
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent, now_us: i64) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.load_error.is_some() {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('c') if ctrl => self.should_quit = true,
                KeyCode::Char('r') => {
                    self.initial_load();
                    if self.load_error.is_none() {
                        self.set_status("Loaded".to_string());
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => self.step(1, now_us),
            KeyCode::Char('k') | KeyCode::Up => self.step(-1, now_us),
            KeyCode::Char('n') => self.advance(now_us),

            // Triage
            KeyCode::Char('i') => self.triage(Stage::Interview, now_us),
            KeyCode::Char('p') => self.triage(Stage::Review, now_us),
            KeyCode::Char('x') => self.triage(Stage::Rejection, now_us),
            KeyCode::Char('h') => self.hide_selected(now_us),

            // Flag, notes
            KeyCode::Char('f') => self.toggle_flag_selected(),
            KeyCode::Char('N') => self.open_notes(),

            // History
            KeyCode::Char('z') => self.undo(now_us),
            KeyCode::Char('Z') => self.redo(now_us),

            // View toggles
            KeyCode::Char('H') => {
                self.show_hidden = !self.show_hidden;
                let projection = self.projection(now_us);
                let rows = self.displayed(&projection);
                self.ensure_selection(&rows);
                self.set_status(format!(
                    "Hidden candidates {} ({} total)",
                    if self.show_hidden { "shown" } else { "hidden" },
                    projection.hidden.len()
                ));
            }
            KeyCode::Char('s') => {
                self.sort_desc = !self.sort_desc;
                self.save();
                self.set_status(format!(
                    "Sort: {}",
                    if self.sort_desc {
                        "newest first"
                    } else {
                        "oldest first"
                    }
                ));
            }

            // Pagination
            KeyCode::Char('m') => self.load_more(),

            // Detail scroll
            KeyCode::PageDown => self.detail_scroll = self.detail_scroll.saturating_add(5),
            KeyCode::PageUp => self.detail_scroll = self.detail_scroll.saturating_sub(5),

            _ => {}
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.note_modal.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };

        match modal.handle_key(key) {
            NoteAction::None => {}
            NoteAction::Cancel => {
                self.note_modal = None;
                self.input_mode = InputMode::Normal;
            }
            NoteAction::Submit => {
                let text = modal.text();
                self.note_modal = None;
                self.input_mode = InputMode::Normal;
                if let Some(id) = self.selected.clone() {
                    self.store.set_notes(&id, &text);
                    self.writer_send(WriteRequest::Notes {
                        candidate_id: id,
                        notes: text,
                    });
                    self.set_status("Saving notes…".to_string());
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn step(&mut self, direction: i32, now_us: i64) {
        let projection = self.projection(now_us);
        let rows = self.displayed(&projection);
        if let Some(next) = navigation::adjacent(&rows, self.selected.as_deref(), direction) {
            self.selected = Some(next);
            self.detail_scroll = 0;
        }
    }

    /// Move to the nearest candidate still awaiting triage.
    fn advance(&mut self, now_us: i64) {
        let projection = self.projection(now_us);
        if let Some(next) =
            navigation::next_untriaged(&projection.visible, self.selected.as_deref())
        {
            self.selected = Some(next);
            self.detail_scroll = 0;
        }
        let rows = self.displayed(&projection);
        self.ensure_selection(&rows);
    }

    fn triage(&mut self, stage: Stage, now_us: i64) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        if self.review.set_stage(&id, stage.clone(), now_us) {
            self.set_status(format!("{} → {stage}", self.short_name(&id)));
        }
        self.advance(now_us);
        self.maybe_migrate_flag(now_us);
        self.save();
    }

    fn hide_selected(&mut self, now_us: i64) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        if self.review.hide(&id, now_us) {
            self.set_status(format!("{} hidden", self.short_name(&id)));
        }
        self.advance(now_us);
        self.maybe_migrate_flag(now_us);
        self.save();
    }

    fn toggle_flag_selected(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let toggle = self.review.toggle_flag(&id);
        let flagged_now = self.review.flagged() == Some(id.as_str());
        self.writer_send(WriteRequest::Flag {
            ops: toggle.ops,
            snapshot: toggle.snapshot,
        });
        self.set_status(if flagged_now {
            format!("Flagged {}", self.short_name(&id))
        } else {
            format!("Unflagged {}", self.short_name(&id))
        });
    }

    /// Migrate the spotlight when the reviewer lands on the next visible
    /// candidate after a triaged-or-hidden flag holder.
    fn maybe_migrate_flag(&mut self, now_us: i64) {
        let Some(current) = self.selected.clone() else {
            return;
        };
        let projection = self.projection(now_us);
        if navigation::flag_should_move(&projection, self.sort_desc, &current) {
            let toggle = self.review.toggle_flag(&current);
            self.writer_send(WriteRequest::Flag {
                ops: toggle.ops,
                snapshot: toggle.snapshot,
            });
            self.set_status(format!("Flag moved to {}", self.short_name(&current)));
        }
    }

    fn undo(&mut self, now_us: i64) {
        match self.review.undo(now_us) {
            Some(outcome) => {
                if let Some(stage) = outcome.remote_fix {
                    // The forward write already fired; reverse it remotely.
                    self.writer_send(WriteRequest::Stage {
                        candidate_id: outcome.candidate_id.clone(),
                        stage,
                    });
                }
                self.set_status(format!(
                    "Undid: {} back to {}",
                    self.short_name(&outcome.candidate_id),
                    outcome.restored
                ));
                self.selected = Some(outcome.candidate_id);
                self.detail_scroll = 0;
                self.save();
            }
            None => self.set_status("Nothing to undo".to_string()),
        }
    }

    fn redo(&mut self, now_us: i64) {
        match self.review.redo(now_us) {
            Some(outcome) => {
                self.set_status(format!(
                    "Redid: {} → {}",
                    self.short_name(&outcome.candidate_id),
                    outcome.applied
                ));
                self.selected = Some(outcome.candidate_id);
                self.detail_scroll = 0;
                self.save();
            }
            None => self.set_status("Nothing to redo".to_string()),
        }
    }

    fn load_more(&mut self) {
        if !self.store.has_more() {
            self.set_status("No more candidates".to_string());
            return;
        }
        match self.store.load_more(self.provider.as_ref(), self.page_size) {
            Ok(outcome) => {
                self.load_more_failed = false;
                self.seed_from_store();
                self.set_status(format!("Loaded {} more", outcome.appended));
            }
            Err(err) => {
                // Existing data stays intact; only this control is marked.
                self.load_more_failed = true;
                self.set_status(format!("Load more failed: {err}"));
            }
        }
    }

    fn open_notes(&mut self) {
        let Some(id) = self.selected.as_deref() else {
            return;
        };
        let notes = self
            .store
            .get(id)
            .map(|c| c.notes.clone())
            .unwrap_or_default();
        self.note_modal = Some(NoteModalState::from_text(&notes));
        self.input_mode = InputMode::Notes;
    }

    fn short_name(&self, id: &str) -> String {
        self.store
            .get(id)
            .map_or_else(|| id.to_string(), Candidate::display_name)
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame) {
        if let Some(detail) = self.load_error.clone() {
            self.render_load_error(frame, &detail);
            return;
        }

        let now_us = chrono::Utc::now().timestamp_micros();
        let projection = self.projection(now_us);
        let rows = self.displayed(&projection);
        self.ensure_selection(&rows);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(chunks[0]);

        self.render_list(frame, panes[0], &projection, &rows);
        self.render_detail(frame, panes[1], &rows);
        self.render_status(frame, chunks[1], &projection);

        if self.input_mode == InputMode::Notes {
            self.render_notes_modal(frame);
        }
    }

    fn render_load_error(&self, frame: &mut Frame, detail: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" sift — load failed ");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Could not load candidates",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(detail.to_string()),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Yellow)),
                Span::raw(" retry   "),
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::raw(" quit"),
            ]),
        ];
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, frame.area());
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        projection: &Projection,
        rows: &[CandidateView],
    ) {
        let table_rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                let mut name_style = Style::default();
                if row.hidden {
                    name_style = name_style.fg(Color::DarkGray);
                }
                // The badge slot shows on the flag holder and on the active
                // row, so the reviewer can see where `f` would land.
                let is_active = self.selected.as_deref() == Some(row.id.as_str());
                let badge = if row.flagged {
                    "⚑ "
                } else if is_active {
                    "⚐ "
                } else {
                    "  "
                };
                let countdown = row
                    .pending_secs
                    .map(|secs| format!(" ·{secs}s"))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(format!("{badge}{}", row.name)).style(name_style),
                    Cell::from(format!("{:>3}", row.score))
                        .style(Style::default().fg(Color::DarkGray)),
                    Cell::from(format!("{}{countdown}", row.stage.label()))
                        .style(Style::default().fg(stage_color(row.stage_class))),
                ])
            })
            .collect();

        let title = format!(
            " Candidates — {} review / {} interview / {} rejected ",
            projection.counts.review, projection.counts.interview, projection.counts.rejection
        );
        let table = Table::new(
            table_rows,
            [
                Constraint::Min(16),
                Constraint::Length(4),
                Constraint::Length(18),
            ],
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("► ");

        let mut state = TableState::default();
        state.select(
            self.selected
                .as_ref()
                .and_then(|id| rows.iter().position(|row| &row.id == id)),
        );
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, rows: &[CandidateView]) {
        let selected = self
            .selected
            .as_deref()
            .and_then(|id| self.store.get(id));
        let Some(candidate) = selected else {
            let placeholder = Paragraph::new("No candidate selected")
                .block(Block::default().borders(Borders::ALL).title(" Detail "));
            frame.render_widget(placeholder, area);
            return;
        };

        let view = rows.iter().find(|row| row.id == candidate.id);
        let mut lines: Vec<Line> = Vec::new();

        let mut headline = vec![Span::styled(
            candidate.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if view.is_some_and(|v| v.flagged) {
            headline.push(Span::styled(" ⚑", Style::default().fg(Color::Yellow)));
        }
        if let Some(view) = view {
            headline.push(Span::raw("   "));
            headline.push(Span::styled(
                view.stage.label().to_string(),
                Style::default().fg(stage_color(view.stage_class)),
            ));
            if let Some(secs) = view.pending_secs {
                headline.push(Span::styled(
                    format!(" (syncing in {secs}s)"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        lines.push(Line::from(headline));

        for (label, value) in [
            ("Email", &candidate.email),
            ("Phone", &candidate.phone),
            ("Birthday", &candidate.birthday),
            ("Location", &candidate.location),
            ("Technical", &candidate.technical),
            ("Previously Applied", &candidate.previously_applied),
        ] {
            if !value.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Cyan)),
                    Span::raw(value.clone()),
                ]));
            }
        }

        push_section(&mut lines, "Company / Project", &candidate.company);
        for (key, heading) in DETAIL_SECTIONS {
            if let Some(answer) = candidate.answers.get(*key) {
                push_section(&mut lines, heading, answer);
            }
        }
        push_section(&mut lines, "Website / Links", &candidate.website);
        push_section(&mut lines, "Video Introduction", &candidate.video_link);
        push_section(&mut lines, "Notes", &candidate.notes);

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Detail "))
            .wrap(Wrap { trim: false })
            .scroll((self.detail_scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, projection: &Projection) {
        let mut spans = vec![
            Span::styled("i", Style::default().fg(Color::Yellow)),
            Span::raw(" interview  "),
            Span::styled("p", Style::default().fg(Color::Yellow)),
            Span::raw(" review  "),
            Span::styled("x", Style::default().fg(Color::Yellow)),
            Span::raw(" reject  "),
            Span::styled("h", Style::default().fg(Color::Yellow)),
            Span::raw(" hide  "),
            Span::styled("f", Style::default().fg(Color::Yellow)),
            Span::raw(" flag  "),
            Span::styled("z/Z", Style::default().fg(Color::Yellow)),
            Span::raw(" undo/redo  "),
            Span::styled("m", Style::default().fg(Color::Yellow)),
            Span::raw(if self.load_more_failed {
                " load more (failed, retry)  "
            } else {
                " load more  "
            }),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ];

        if !projection.hidden.is_empty() {
            spans.push(Span::styled(
                format!("  [{} hidden]", projection.hidden.len()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if let Some((msg, since)) = &self.status_msg {
            if since.elapsed() < Duration::from_secs(3) {
                spans.push(Span::raw("  |  "));
                spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
            }
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_notes_modal(&self, frame: &mut Frame) {
        let Some(modal) = &self.note_modal else {
            return;
        };
        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(ratatui::widgets::Clear, area);

        let mut lines: Vec<Line> = modal
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == modal.row {
                    Line::from(with_cursor(line, modal.col))
                } else {
                    Line::from(line.clone())
                }
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ctrl-S save · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Notes "))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

fn push_section(lines: &mut Vec<Line>, heading: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        heading.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(body.to_string()));
}

const fn stage_color(class: StageClass) -> Color {
    match class {
        StageClass::Rejected => Color::Red,
        StageClass::Accepted => Color::Green,
        StageClass::Stage3 => Color::Magenta,
        StageClass::Interview => Color::Yellow,
        StageClass::Waitlist => Color::Blue,
        StageClass::Review => Color::Cyan,
        StageClass::Default => Color::Gray,
    }
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

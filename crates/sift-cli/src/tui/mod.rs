//! Terminal user interface for sift.
//!
//! Provides the full-screen review screen: candidate list, detail pane,
//! and keyboard triage with undo/redo and deferred remote sync.
//!
//! ## Entry points
//!
//! - [`run`] — terminal setup, the event loop, teardown.

pub mod review;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use review::ReviewApp;
use std::io;
use std::time::Duration;

/// Poll timeout for the input loop. Short enough that pending-write
/// countdowns update about once a second without a dedicated timer.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the review TUI until the user quits.
pub fn run(app: &mut ReviewApp) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    app.finish();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ReviewApp,
) -> Result<()> {
    loop {
        app.tick(now_us());
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, now_us())?;
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

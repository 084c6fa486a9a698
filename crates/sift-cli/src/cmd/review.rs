//! `sift review` — launch the full-screen review TUI.

use crate::output::{CliError, OutputMode, render_error};
use crate::tui;
use crate::tui::review::ReviewApp;
use anyhow::Result;
use clap::Args;
use sift_airtable::AirtableProvider;
use std::path::Path;
use std::sync::Arc;

/// Arguments for `sift review`.
#[derive(Args, Debug, Default)]
pub struct ReviewArgs {}

/// Execute `sift review`.
pub fn run_review(_args: &ReviewArgs, project_root: &Path) -> Result<()> {
    let provider = match AirtableProvider::from_env() {
        Ok(provider) => Arc::new(provider),
        Err(err) => {
            // Missing credentials are a setup problem, not a transient
            // error: print the prompt and exit instead of opening the TUI.
            render_error(OutputMode::Human, &CliError::from(&err))?;
            anyhow::bail!("provider not configured");
        }
    };

    let mut app = ReviewApp::new(provider, project_root)?;
    tui::run(&mut app)
}

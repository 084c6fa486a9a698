//! `sift health` — provider configuration check.

use crate::output::{OutputMode, render};
use clap::Args;
use serde::Serialize;
use std::env;
use std::io::Write;

/// Arguments for `sift health`.
#[derive(Args, Debug, Default)]
pub struct HealthArgs {}

#[derive(Debug, Serialize)]
struct HealthOutput {
    has_token: bool,
    has_base_id: bool,
    has_table_name: bool,
    ready: bool,
}

fn present(var: &str) -> bool {
    env::var(var).is_ok_and(|v| !v.is_empty())
}

/// Execute `sift health`.
pub fn run_health(_args: &HealthArgs, output: OutputMode) -> anyhow::Result<()> {
    let has_token = present("AIRTABLE");
    let has_base_id = present("AIRTABLE_BASE_ID");
    let has_table_name = present("AIRTABLE_TABLE_NAME");

    let payload = HealthOutput {
        has_token,
        has_base_id,
        has_table_name,
        ready: has_token && has_base_id && has_table_name,
    };

    render(output, &payload, |report, w| render_health_human(report, w))
}

fn render_health_human(report: &HealthOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    writeln!(w, "Provider configuration")?;
    writeln!(w, "  {} AIRTABLE (token)", mark(report.has_token))?;
    writeln!(w, "  {} AIRTABLE_BASE_ID", mark(report.has_base_id))?;
    writeln!(
        w,
        "  {} AIRTABLE_TABLE_NAME (defaults to \"Applications\")",
        mark(report.has_table_name)
    )?;
    writeln!(w)?;
    if report.ready {
        writeln!(w, "Ready. Run `sift review` to start.")?;
    } else {
        writeln!(w, "Not ready: set the missing variables above.")?;
    }
    Ok(())
}

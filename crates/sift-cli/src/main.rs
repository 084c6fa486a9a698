#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;
mod writer;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sift: keyboard-driven applicant review for Airtable pipelines",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Review candidates in a full-screen TUI",
        long_about = "Open the full-screen review screen: candidate list, detail pane, and keyboard triage.",
        after_help = "EXAMPLES:\n    # Start reviewing\n    sift review\n\nKEYS:\n    j/k step    n next untriaged    i interview    p review    x reject\n    h hide      H show hidden       f flag         N notes     z/Z undo/redo\n    s sort      m load more         q quit"
    )]
    Review(cmd::review::ReviewArgs),

    #[command(
        about = "List candidates",
        long_about = "Fetch one page of candidates and print the projected list.",
        after_help = "EXAMPLES:\n    # Print the newest candidates\n    sift list\n\n    # Emit machine-readable output\n    sift list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        about = "Check provider configuration",
        long_about = "Report which Airtable environment variables are present and whether the tool is ready to run.",
        after_help = "EXAMPLES:\n    # Check configuration\n    sift health\n\n    # Emit machine-readable output\n    sift health --json"
    )]
    Health(cmd::health::HealthArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("SIFT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "sift=warn"
        } else if verbose || env::var("DEBUG").is_ok() {
            "sift=debug,info"
        } else {
            "sift=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let project_root = env::current_dir()?;
    let mode = cli.output_mode();

    match &cli.command {
        Commands::Review(args) => cmd::review::run_review(args, &project_root),
        Commands::List(args) => cmd::list::run_list(args, mode, &project_root),
        Commands::Health(args) => cmd::health::run_health(args, mode),
    }
}

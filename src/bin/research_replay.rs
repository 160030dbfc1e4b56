//! Replay a recorded research session.
//!
//! Reads one JSON event per line, feeds the events through a session
//! controller rendering to stdout, and optionally exports the final report.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use research_console::export::{export_report, suggested_output_path, ExportFormat, ExportOptions};
use research_console::reactor::{self, NullSink};
use research_console::{ConsoleConfig, SessionController, TerminalDisplay};

#[derive(Parser)]
#[command(name = "research-replay")]
#[command(about = "Replay a JSON-lines research event log through the console", long_about = None)]
struct Cli {
    /// Event log, one JSON event per line
    events: PathBuf,

    /// Research topic submitted before replaying
    #[arg(short, long)]
    topic: String,

    /// Write the final report as HTML (default path derived from the topic)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    html: Option<Option<PathBuf>>,

    /// Write the final report as Markdown (default path derived from the topic)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    markdown: Option<Option<PathBuf>>,

    /// Console configuration (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable ANSI styling even on a terminal
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = if cli.verbose {
        EnvFilter::new(log_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };

    let stdout = std::io::stdout();
    let ansi = !cli.no_color && stdout.is_terminal();
    let display = TerminalDisplay::new(stdout).with_ansi(ansi);
    let mut controller = SessionController::new(display, NullSink, config);

    controller.submit(&cli.topic)?;

    let file = tokio::fs::File::open(&cli.events)
        .await
        .with_context(|| format!("failed to open event log '{}'", cli.events.display()))?;
    let stats = reactor::run_lines(&mut controller, BufReader::new(file)).await?;
    info!(
        events = stats.events,
        applied = stats.applied,
        dropped = stats.dropped,
        undecodable = stats.undecodable,
        phase = %stats.phase,
        "replay finished"
    );

    let exports = [
        (ExportFormat::Html, cli.html),
        (ExportFormat::Markdown, cli.markdown),
    ];
    for (format, output) in exports {
        let Some(output) = output else {
            continue;
        };
        let output =
            output.unwrap_or_else(|| suggested_output_path(controller.session().topic(), format));
        let Some(document) = controller.last_report() else {
            bail!("no final report in '{}' to export", cli.events.display());
        };
        let options = ExportOptions::new(format).output(output);
        export_report(&controller.report_title(), document, &options)?;
    }

    Ok(())
}

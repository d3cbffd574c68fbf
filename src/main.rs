mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{BackfillArgs, Cli, Command, SurveyArgs};
use reposurvey::backfill::Backfill;
use reposurvey::survey::Survey;
use reposurvey::view::{render_json, render_plaintext};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reposurvey={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Name the report after the absolute path when it can be resolved
fn display_name(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn survey(args: &SurveyArgs, verbose: u8) -> Result<()> {
    let report = Survey::new(&args.repo_path, args.flags(verbose)).run()?;
    let name = display_name(&args.repo_path);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        render_json(&report, &name, &mut out).context("Failed to write JSON report")?;
    } else {
        render_plaintext(&report, &name, &mut out).context("Failed to write report")?;
    }
    out.flush()?;
    Ok(())
}

fn backfill(args: &BackfillArgs) -> Result<()> {
    let stats = Backfill::new(&args.repo_path, args.batch_size, args.sparse()).run()?;
    tracing::info!(
        blobs = stats.blobs_inspected,
        queued = stats.queued,
        batches = stats.batches,
        "backfill complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Survey(args) => survey(args, cli.verbose),
        Command::Backfill(args) => backfill(args),
    }
}

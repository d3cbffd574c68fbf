use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use reposurvey::backfill::DEFAULT_BATCH_SIZE;
use reposurvey::survey::{RefsWanted, SurveyFlags};

#[derive(Parser, Debug)]
#[command(name = "reposurvey", version, about = "Measure and backfill git repositories")]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report ref counts, object sizes and the largest paths
    Survey(SurveyArgs),
    /// Download blobs a partial clone is missing
    Backfill(BackfillArgs),
}

#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Path to the git repository
    #[arg(default_value = ".")]
    pub repo_path: PathBuf,

    /// Rows per ranked table [config: survey.top, default: 10]
    #[arg(short = 'n', long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Show progress [config: survey.progress, default: when stderr is a terminal]
    #[arg(long, overrides_with = "no_progress")]
    pub progress: bool,

    #[arg(long, overrides_with = "progress", hide = true)]
    pub no_progress: bool,

    /// Include every ref, detached HEAD included
    #[arg(long)]
    pub all_refs: bool,

    /// Include branches (refs/heads/)
    #[arg(long)]
    pub branches: bool,

    /// Include tags (refs/tags/)
    #[arg(long)]
    pub tags: bool,

    /// Include remote-tracking refs (refs/remotes/)
    #[arg(long)]
    pub remotes: bool,

    /// Include a detached HEAD
    #[arg(long)]
    pub detached: bool,

    /// Include notes and stashes
    #[arg(long)]
    pub other: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SurveyArgs {
    /// Flags left at their default are reported as unset
    pub fn flags(&self, verbose: u8) -> SurveyFlags {
        let set = |on: bool| on.then_some(true);
        let progress = if self.progress {
            Some(true)
        } else if self.no_progress {
            Some(false)
        } else {
            None
        };

        SurveyFlags {
            top_nr: self.top,
            progress,
            verbose: (verbose > 0).then_some(true),
            refs: RefsWanted {
                all: set(self.all_refs),
                branches: set(self.branches),
                tags: set(self.tags),
                remotes: set(self.remotes),
                detached: set(self.detached),
                other: set(self.other),
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct BackfillArgs {
    /// Path to the git repository
    #[arg(default_value = ".")]
    pub repo_path: PathBuf,

    /// Blobs per fetch
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BATCH_SIZE,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub batch_size: usize,

    /// Only fetch blobs inside the sparse-checkout cone [default: core.sparseCheckout]
    #[arg(long, overrides_with = "no_sparse")]
    pub sparse: bool,

    #[arg(long, overrides_with = "sparse", hide = true)]
    pub no_sparse: bool,
}

impl BackfillArgs {
    pub fn sparse(&self) -> Option<bool> {
        if self.sparse {
            Some(true)
        } else if self.no_sparse {
            Some(false)
        } else {
            None
        }
    }
}

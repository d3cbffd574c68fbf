//! Partial-clone backfill
//!
//! Walks the blobs reachable from HEAD and downloads the ones that are only
//! promised by the remote, a batch at a time.

mod batcher;

pub use batcher::{BackfillBatcher, BackfillStats, DEFAULT_BATCH_SIZE};

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::error::Error;
use crate::model::ObjectId;
use crate::repository::{
    self, BatchFetcher, GitPromisorFetcher, GixObjectStore, ObjectInfoSource, ObjectWalker,
    PathWalk, RepoSettings, SparsePatterns, WalkWants,
};

/// Backfill against arbitrary collaborators.
///
/// On a walk error the pending ids are dropped without fetching and the
/// error is returned; otherwise whatever is left over is fetched last.
pub fn run_backfill(
    walker: &dyn ObjectWalker,
    roots: &[ObjectId],
    store: &mut dyn ObjectInfoSource,
    fetcher: &mut dyn BatchFetcher,
    batch_size: usize,
) -> Result<BackfillStats, Error> {
    let _span = tracing::debug_span!("backfill.walk").entered();
    let start = Instant::now();

    let mut batcher = BackfillBatcher::new(store, fetcher, batch_size);
    if let Err(err) = walker.walk(roots, WalkWants::blobs_only(), &mut batcher) {
        batcher.clear();
        return Err(err);
    }
    batcher.flush()?;

    let stats = batcher.finish();
    tracing::debug!(elapsed = ?start.elapsed(), ?stats, "backfill walk complete");
    Ok(stats)
}

/// A backfill of the repository at `repo_path`
pub struct Backfill {
    repo_path: PathBuf,
    batch_size: usize,
    /// `None` defers to `core.sparseCheckout`
    sparse: Option<bool>,
}

impl Backfill {
    pub fn new(repo_path: impl Into<PathBuf>, batch_size: usize, sparse: Option<bool>) -> Self {
        Self {
            repo_path: repo_path.into(),
            batch_size,
            sparse,
        }
    }

    pub fn run(&self) -> Result<BackfillStats> {
        let repo = repository::open(&self.repo_path)?;
        let settings = RepoSettings::load(&repo);

        let head = repo.head().context("Failed to read HEAD")?;
        let Some(head) = head.id().map(|id| id.detach()) else {
            tracing::info!("HEAD is unborn, nothing to backfill");
            return Ok(BackfillStats::default());
        };

        let mut walker = PathWalk::new(repo.clone());
        if self.sparse.unwrap_or(settings.sparse_checkout) {
            let patterns = SparsePatterns::load(repo.git_dir())?;
            walker = walker.with_filter(Box::new(patterns));
        }

        let mut store = GixObjectStore::new(repo.clone());
        let mut fetcher =
            GitPromisorFetcher::new(repo.git_dir().to_path_buf(), settings.promisor_remote);

        run_backfill(&walker, &[head], &mut store, &mut fetcher, self.batch_size)
            .with_context(|| format!("Backfill of {} failed", self.repo_path.display()))
    }
}

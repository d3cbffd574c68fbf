//! Collaborators the engines run against
//!
//! Each concern is a trait (so the engines can be driven by in-memory fakes)
//! with a gix-backed implementation:
//!
//! - **odb**: prefetch-safe object metadata (`ObjectInfoSource`)
//! - **pack**: on-disk size index over pack files and loose objects
//! - **walk**: path-aware reachability walk (`ObjectWalker`, `UnitSink`)
//! - **refs**: reference enumeration (`RefSource`)
//! - **fetch**: batch download from the promisor remote (`BatchFetcher`)
//! - **sparse**: cone-mode sparse-checkout predicate (`PathFilter`)
//! - **config**: settings read from git config
//! - **progress**: progress reporting

mod config;
mod fetch;
mod odb;
mod pack;
mod progress;
mod refs;
mod sparse;
mod walk;

pub use config::RepoSettings;
pub use fetch::{BatchFetcher, GitPromisorFetcher};
pub use odb::{GixObjectStore, ObjectInfoSource};
pub use progress::{reporter, IndicatifProgress, NoopProgress, ProgressHandle, ProgressReporter};
pub use refs::{GitRefSource, RefSource};
pub use sparse::SparsePatterns;
pub use walk::{ObjectWalker, PathFilter, PathWalk, UnitSink, WalkWants};

use anyhow::{Context, Result};
use std::path::Path;

/// Open the repository at `path`
pub fn open(path: &Path) -> Result<gix::Repository> {
    gix::open(path).context("Failed to open git repository")
}

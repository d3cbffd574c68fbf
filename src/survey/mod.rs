//! Repository survey
//!
//! Enumerates the selected refs, counts them, then walks everything they
//! reach and sizes each object up by type and by path.

mod census;
mod classifier;
mod options;

pub use census::RefCensus;
pub use classifier::ObjectClassifier;
pub use options::{RefsWanted, SurveyFlags, SurveyOptions, DEFAULT_TOP_NR};

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::error::Error;
use crate::model::{ObjectId, Report};
use crate::repository::{
    self, GitRefSource, GixObjectStore, ObjectInfoSource, ObjectWalker, PathWalk, ProgressReporter,
    RefSource, RepoSettings, WalkWants,
};

/// Run a survey against arbitrary collaborators.
///
/// Refs are sorted by object id before they are counted, so the walk gets
/// its roots in a stable order. A walk failure is returned as-is.
pub fn run_survey(
    refs: &dyn RefSource,
    info: &dyn ObjectInfoSource,
    walker: &dyn ObjectWalker,
    options: &SurveyOptions,
    progress: &dyn ProgressReporter,
) -> Result<Report, Error> {
    let mut report = Report::new(options.refs, options.top_nr);

    let roots = {
        let _span = tracing::debug_span!("survey.refs").entered();
        let start = Instant::now();

        let bar = progress.start("Scanning refs", None);
        let mut records = refs.enumerate(&options.refs.patterns())?;
        records.sort_by(|a, b| a.object_id.cmp(&b.object_id));
        bar.inc(records.len() as u64);
        bar.finish();

        RefCensus::new(info).classify(&mut report.refs, &records);

        let bar = progress.start("Preparing object walk", Some(records.len() as u64));
        let roots: Vec<ObjectId> = records
            .iter()
            .map(|record| {
                bar.inc(1);
                record.object_id
            })
            .collect();
        bar.finish();

        tracing::debug!(refs = records.len(), elapsed = ?start.elapsed(), "refs counted");
        roots
    };

    {
        let _span = tracing::debug_span!("survey.objects").entered();
        let start = Instant::now();

        let bar = progress.start("Walking objects", None);
        let mut classifier = ObjectClassifier::new(info, &mut report, bar.as_ref());
        walker.walk(&roots, WalkWants::all(), &mut classifier)?;
        bar.finish();

        tracing::debug!(elapsed = ?start.elapsed(), "object walk complete");
    }

    Ok(report)
}

/// A survey of the repository at `repo_path`
pub struct Survey {
    repo_path: PathBuf,
    flags: SurveyFlags,
}

impl Survey {
    pub fn new(repo_path: impl Into<PathBuf>, flags: SurveyFlags) -> Self {
        Self {
            repo_path: repo_path.into(),
            flags,
        }
    }

    /// Resolve options against the repository's config, then survey it
    pub fn run(&self) -> Result<Report> {
        let repo = repository::open(&self.repo_path)?;
        let settings = RepoSettings::load(&repo);
        let options =
            SurveyOptions::resolve(&self.flags, &settings, std::io::stderr().is_terminal());

        if options.verbose {
            tracing::info!(
                top = options.top_nr,
                refs = ?options.refs.patterns(),
                "surveying {}",
                self.repo_path.display()
            );
        }

        let refs = GitRefSource::new(repo.clone());
        let info = GixObjectStore::new(repo.clone());
        let walker = PathWalk::new(repo);
        let progress = repository::reporter(options.show_progress);

        let start = Instant::now();
        let report = run_survey(&refs, &info, &walker, &options, progress.as_ref())
            .with_context(|| format!("Survey of {} failed", self.repo_path.display()))?;

        if options.verbose {
            tracing::info!(elapsed = ?start.elapsed(), "survey complete");
        }
        Ok(report)
    }
}

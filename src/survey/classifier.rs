//! Per-unit size accounting

use crate::error::Error;
use crate::model::{Report, SizeTally, TraversalUnit};
use crate::repository::{ObjectInfoSource, ProgressHandle, UnitSink};

/// Folds each walked unit into the report's totals and leaderboards
pub struct ObjectClassifier<'a> {
    info: &'a dyn ObjectInfoSource,
    report: &'a mut Report,
    progress: &'a dyn ProgressHandle,
}

impl<'a> ObjectClassifier<'a> {
    pub fn new(
        info: &'a dyn ObjectInfoSource,
        report: &'a mut Report,
        progress: &'a dyn ProgressHandle,
    ) -> Self {
        Self {
            info,
            report,
            progress,
        }
    }

    /// Size up one unit without touching the report
    fn tally(&self, unit: &TraversalUnit<'_>) -> SizeTally {
        let mut tally = SizeTally::default();
        for id in unit.ids {
            match self.info.object_info(id) {
                Ok(info) => tally.add_present(info.disk_size, info.size),
                Err(_) => tally.add_missing(),
            }
        }
        tally
    }
}

impl UnitSink for ObjectClassifier<'_> {
    fn observe(&mut self, unit: &TraversalUnit<'_>) -> Result<(), Error> {
        let tally = self.tally(unit);

        self.report
            .reachable
            .increment(unit.kind, unit.ids.len() as u64);
        self.report.total_mut(unit.kind).merge(&tally);
        if let Some(boards) = self.report.leaderboards_mut(unit.kind) {
            boards.consider(unit.label(), &tally);
        }

        self.progress.inc(unit.ids.len() as u64);
        Ok(())
    }
}

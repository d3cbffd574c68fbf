//! Ref census

use crate::model::{ObjectKind, RefKind, RefRecord, RefSummary};
use crate::repository::ObjectInfoSource;

/// Counts refs by kind and tells annotated tags from lightweight ones
pub struct RefCensus<'a> {
    info: &'a dyn ObjectInfoSource,
}

impl<'a> RefCensus<'a> {
    pub fn new(info: &'a dyn ObjectInfoSource) -> Self {
        Self { info }
    }

    /// Fold `refs` into `summary`.
    ///
    /// Every tag costs exactly one type lookup: it is annotated when the ref
    /// points at a tag object rather than straight at its target. Detached
    /// HEAD is counted as unknown.
    pub fn classify(&self, summary: &mut RefSummary, refs: &[RefRecord]) {
        summary.refs_nr += refs.len() as u64;

        for record in refs {
            match record.kind {
                RefKind::Tag => {
                    summary.tags_nr += 1;
                    let annotated = self
                        .info
                        .object_info(&record.object_id)
                        .is_ok_and(|info| info.kind == ObjectKind::Tag);
                    if annotated {
                        summary.tags_annotated_nr += 1;
                    }
                }
                RefKind::Branch => summary.branches_nr += 1,
                RefKind::Remote => summary.remote_refs_nr += 1,
                RefKind::Other => summary.others_nr += 1,
                RefKind::Detached | RefKind::Unknown => summary.unknown_nr += 1,
            }
        }
    }
}

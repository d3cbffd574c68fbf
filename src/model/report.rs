//! The survey report
//!
//! Created once per survey, filled in by the ref census and the object
//! classifier while the walk runs, then handed to a renderer as-is.

use serde::Serialize;

use super::object::ObjectKind;
use super::refs::{RefSelection, RefSummary};
use super::size::{SizeRecord, SizeTally};
use super::top::{Ranking, TopTable};

/// Number of ids walked per object type, present or missing
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub commits_nr: u64,
    pub trees_nr: u64,
    pub blobs_nr: u64,
    pub tags_nr: u64,
}

impl ObjectSummary {
    pub fn increment(&mut self, kind: ObjectKind, nr: u64) {
        match kind {
            ObjectKind::Commit => self.commits_nr += nr,
            ObjectKind::Tree => self.trees_nr += nr,
            ObjectKind::Blob => self.blobs_nr += nr,
            ObjectKind::Tag => self.tags_nr += nr,
        }
    }

    pub fn get(&self, kind: ObjectKind) -> u64 {
        match kind {
            ObjectKind::Commit => self.commits_nr,
            ObjectKind::Tree => self.trees_nr,
            ObjectKind::Blob => self.blobs_nr,
            ObjectKind::Tag => self.tags_nr,
        }
    }
}

/// The three leaderboards kept for one path-bearing object kind
#[derive(Debug, Clone, Serialize)]
pub struct PathLeaderboards {
    pub by_count: TopTable,
    pub by_disk_size: TopTable,
    pub by_inflated_size: TopTable,
}

impl PathLeaderboards {
    fn new(noun: &str, capacity: usize) -> Self {
        Self {
            by_count: TopTable::new(format!("TOP {noun} BY COUNT"), Ranking::Count, capacity),
            by_disk_size: TopTable::new(
                format!("TOP {noun} BY DISK SIZE"),
                Ranking::DiskSize,
                capacity,
            ),
            by_inflated_size: TopTable::new(
                format!("TOP {noun} BY INFLATED SIZE"),
                Ranking::InflatedSize,
                capacity,
            ),
        }
    }

    /// Offer one path's tally to all three tables
    pub fn consider(&mut self, label: &str, tally: &SizeTally) {
        self.by_count.consider(label, tally);
        self.by_disk_size.consider(label, tally);
        self.by_inflated_size.consider(label, tally);
    }

    pub fn table(&self, ranking: Ranking) -> &TopTable {
        match ranking {
            Ranking::Count => &self.by_count,
            Ranking::DiskSize => &self.by_disk_size,
            Ranking::InflatedSize => &self.by_inflated_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Ref kinds the census was run over
    pub selection: RefSelection,
    pub refs: RefSummary,
    pub reachable: ObjectSummary,
    /// Size totals indexed by `ObjectKind::index`
    pub totals: [SizeRecord; 4],
    pub trees: PathLeaderboards,
    pub blobs: PathLeaderboards,
}

impl Report {
    pub fn new(selection: RefSelection, top_nr: usize) -> Self {
        Self {
            selection,
            refs: RefSummary::default(),
            reachable: ObjectSummary::default(),
            totals: ObjectKind::ALL.map(|kind| SizeRecord::new(kind.label(), SizeTally::default())),
            trees: PathLeaderboards::new("DIRECTORIES", top_nr),
            blobs: PathLeaderboards::new("FILES", top_nr),
        }
    }

    pub fn total(&self, kind: ObjectKind) -> &SizeTally {
        &self.totals[kind.index()].tally
    }

    pub fn total_mut(&mut self, kind: ObjectKind) -> &mut SizeTally {
        &mut self.totals[kind.index()].tally
    }

    /// Leaderboards for a path-bearing kind
    pub fn leaderboards_mut(&mut self, kind: ObjectKind) -> Option<&mut PathLeaderboards> {
        match kind {
            ObjectKind::Tree => Some(&mut self.trees),
            ObjectKind::Blob => Some(&mut self.blobs),
            ObjectKind::Commit | ObjectKind::Tag => None,
        }
    }

    /// The six ranked tables in presentation order
    pub fn top_tables(&self) -> impl Iterator<Item = &TopTable> {
        Ranking::ALL
            .into_iter()
            .flat_map(move |ranking| [self.trees.table(ranking), self.blobs.table(ranking)])
    }
}

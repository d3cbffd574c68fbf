//! Bounded leaderboards
//!
//! A `TopTable` keeps the best `capacity` records seen so far by one metric,
//! in a single pass and without retaining anything else. Capacity is a small
//! operator-chosen constant, so the insertion point is found with a linear
//! scan from the bottom of the table.

use serde::Serialize;

use super::size::{SizeRecord, SizeTally};

/// Metric a table is ranked by
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    Count,
    DiskSize,
    InflatedSize,
}

impl Ranking {
    pub const ALL: [Ranking; 3] = [Ranking::Count, Ranking::DiskSize, Ranking::InflatedSize];

    #[inline]
    pub fn key(self, tally: &SizeTally) -> u64 {
        match self {
            Ranking::Count => tally.count,
            Ranking::DiskSize => tally.disk_size,
            Ranking::InflatedSize => tally.inflated_size,
        }
    }
}

/// Fixed-capacity list of records, sorted descending by `ranking`
#[derive(Debug, Clone, Serialize)]
pub struct TopTable {
    name: String,
    ranking: Ranking,
    capacity: usize,
    entries: Vec<SizeRecord>,
}

impl TopTable {
    pub fn new(name: impl Into<String>, ranking: Ranking, capacity: usize) -> Self {
        Self {
            name: name.into(),
            ranking,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Offer a candidate to the table.
    ///
    /// Ties keep the earlier entry ahead, so a candidate that only ties the
    /// current minimum of a full table is discarded. The label is copied
    /// only when the candidate is kept. Returns whether it was kept.
    pub fn consider(&mut self, label: &str, tally: &SizeTally) -> bool {
        let key = self.ranking.key(tally);

        let mut pos = self.entries.len();
        while pos > 0 && self.ranking.key(&self.entries[pos - 1].tally) < key {
            pos -= 1;
        }

        if pos >= self.capacity {
            return false;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(pos, SizeRecord::new(label, *tally));
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[SizeRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

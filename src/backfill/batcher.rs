//! Batched download of missing blobs

use rustc_hash::FxHashSet;

use crate::error::Error;
use crate::model::{ObjectId, ObjectKind, TraversalUnit};
use crate::repository::{BatchFetcher, ObjectInfoSource, UnitSink};

pub const DEFAULT_BATCH_SIZE: usize = 50_000;

/// What a backfill run did
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct BackfillStats {
    /// Blob ids looked at, duplicates included
    pub blobs_inspected: u64,
    /// Ids handed to the fetcher
    pub queued: u64,
    /// Fetches issued
    pub batches: u64,
}

/// Collects blobs that are not materialized locally and downloads them in
/// batches of `batch_size`.
///
/// After each download the store is refreshed, so a blob fetched by an
/// earlier batch is seen as present and not queued again. Only the pending
/// batch is deduplicated in memory, so memory stays bounded by `batch_size`.
pub struct BackfillBatcher<'a> {
    store: &'a mut dyn ObjectInfoSource,
    fetcher: &'a mut dyn BatchFetcher,
    pending: Vec<ObjectId>,
    /// Mirrors `pending` for membership checks
    pending_set: FxHashSet<ObjectId>,
    batch_size: usize,
    stats: BackfillStats,
}

impl<'a> BackfillBatcher<'a> {
    /// `batch_size` below 1 is treated as 1
    pub fn new(
        store: &'a mut dyn ObjectInfoSource,
        fetcher: &'a mut dyn BatchFetcher,
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            fetcher,
            pending: Vec::with_capacity(batch_size.min(DEFAULT_BATCH_SIZE)),
            pending_set: FxHashSet::default(),
            batch_size,
            stats: BackfillStats::default(),
        }
    }

    fn needs_fetch(&self, id: &ObjectId) -> bool {
        match self.store.object_info(id) {
            Ok(info) => info.disk_size == 0,
            Err(_) => true,
        }
    }

    /// Download everything pending, then rescan local storage.
    ///
    /// The pending list is emptied before the download, so it is empty
    /// afterwards whether or not the fetch succeeded.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.pending);
        self.pending_set.clear();
        self.stats.batches += 1;
        tracing::info!(batch = self.stats.batches, size = batch.len(), "fetching batch");

        self.fetcher.fetch(&batch)?;
        self.store.refresh()?;
        Ok(())
    }

    /// Drop pending ids without fetching them
    pub fn clear(&mut self) {
        self.pending = Vec::new();
        self.pending_set.clear();
    }

    pub fn pending(&self) -> &[ObjectId] {
        &self.pending
    }

    pub fn finish(self) -> BackfillStats {
        self.stats
    }
}

impl UnitSink for BackfillBatcher<'_> {
    fn observe(&mut self, unit: &TraversalUnit<'_>) -> Result<(), Error> {
        if unit.kind != ObjectKind::Blob {
            return Ok(());
        }

        for id in unit.ids {
            self.stats.blobs_inspected += 1;
            if self.pending_set.contains(id) || !self.needs_fetch(id) {
                continue;
            }

            self.pending_set.insert(*id);
            self.pending.push(*id);
            self.stats.queued += 1;

            if self.pending.len() >= self.batch_size {
                if let Err(err) = self.flush() {
                    self.clear();
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFound;
    use crate::model::ObjectInfo;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn oid(n: u8) -> ObjectId {
        ObjectId::Sha1([n; 20])
    }

    /// Local storage shared with the fetcher, so fetched blobs show up
    /// once the store is refreshed
    type Disk = Rc<RefCell<HashMap<ObjectId, u64>>>;

    struct FakeStore {
        disk: Disk,
        visible: HashMap<ObjectId, u64>,
        refreshes: usize,
        /// Refresh without picking up new objects
        stale: bool,
    }

    impl FakeStore {
        fn new(disk: &Disk) -> Self {
            Self {
                disk: Rc::clone(disk),
                visible: disk.borrow().clone(),
                refreshes: 0,
                stale: false,
            }
        }
    }

    impl ObjectInfoSource for FakeStore {
        fn object_info(&self, id: &ObjectId) -> Result<ObjectInfo, NotFound> {
            self.visible
                .get(id)
                .map(|&disk_size| ObjectInfo {
                    kind: ObjectKind::Blob,
                    size: 10,
                    disk_size,
                })
                .ok_or(NotFound(*id))
        }

        fn refresh(&mut self) -> Result<(), Error> {
            self.refreshes += 1;
            if !self.stale {
                self.visible = self.disk.borrow().clone();
            }
            Ok(())
        }
    }

    struct FakeFetcher {
        disk: Disk,
        batches: Vec<Vec<ObjectId>>,
        fail: bool,
    }

    impl FakeFetcher {
        fn new(disk: &Disk) -> Self {
            Self {
                disk: Rc::clone(disk),
                batches: Vec::new(),
                fail: false,
            }
        }
    }

    impl BatchFetcher for FakeFetcher {
        fn fetch(&mut self, ids: &[ObjectId]) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Fetch {
                    remote: "origin".to_owned(),
                    count: ids.len(),
                    message: "could not read from remote repository".to_owned(),
                });
            }
            self.batches.push(ids.to_vec());
            let mut disk = self.disk.borrow_mut();
            for id in ids {
                disk.insert(*id, 7);
            }
            Ok(())
        }
    }

    fn blobs<'a>(path: &'a str, ids: &'a [ObjectId]) -> TraversalUnit<'a> {
        TraversalUnit::new(Some(path), ids, ObjectKind::Blob)
    }

    #[test]
    fn test_threshold_triggers_flush() {
        let disk: Disk = Rc::default();
        disk.borrow_mut().insert(oid(1), 0);
        disk.borrow_mut().insert(oid(2), 5);
        disk.borrow_mut().insert(oid(3), 0);
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 2);
        batcher.observe(&blobs("a", &[oid(1), oid(2), oid(3)])).unwrap();
        assert!(batcher.pending().is_empty());

        let stats = batcher.finish();
        assert_eq!(stats.blobs_inspected, 3);
        assert_eq!(stats.queued, 2);
        assert_eq!(stats.batches, 1);
        assert_eq!(fetcher.batches, vec![vec![oid(1), oid(3)]]);
        assert_eq!(store.refreshes, 1);
    }

    #[test]
    fn test_non_blob_units_ignored() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 1);
        batcher
            .observe(&TraversalUnit::new(Some("dir/"), &[oid(1)], ObjectKind::Tree))
            .unwrap();
        batcher
            .observe(&TraversalUnit::new(None, &[oid(2)], ObjectKind::Commit))
            .unwrap();

        assert_eq!(batcher.finish(), BackfillStats::default());
        assert!(fetcher.batches.is_empty());
    }

    #[test]
    fn test_fetched_blob_not_requeued() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 1);
        batcher.observe(&blobs("a", &[oid(1)])).unwrap();
        batcher.observe(&blobs("b", &[oid(1), oid(2)])).unwrap();
        batcher.flush().unwrap();

        assert_eq!(batcher.finish().queued, 2);
        assert_eq!(fetcher.batches, vec![vec![oid(1)], vec![oid(2)]]);
        assert_eq!(store.refreshes, 2);
    }

    #[test]
    fn test_blob_requeued_when_refresh_misses_it() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        store.stale = true;
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 1);
        batcher.observe(&blobs("a", &[oid(1)])).unwrap();
        batcher.observe(&blobs("b", &[oid(1)])).unwrap();

        assert_eq!(batcher.finish().queued, 2);
        assert_eq!(fetcher.batches, vec![vec![oid(1)], vec![oid(1)]]);
    }

    #[test]
    fn test_dedup_resets_after_flush() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        store.stale = true;
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 3);
        batcher.observe(&blobs("a", &[oid(1), oid(1), oid(2)])).unwrap();
        assert_eq!(batcher.pending(), [oid(1), oid(2)]);
        batcher.flush().unwrap();
        batcher.observe(&blobs("b", &[oid(2)])).unwrap();
        assert_eq!(batcher.pending(), [oid(2)]);
    }

    #[test]
    fn test_duplicates_within_batch_skipped() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 10);
        batcher.observe(&blobs("a", &[oid(1)])).unwrap();
        batcher.observe(&blobs("copy-of-a", &[oid(1)])).unwrap();
        assert_eq!(batcher.pending(), [oid(1)]);
    }

    #[test]
    fn test_final_partial_flush() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 2);
        batcher.observe(&blobs("a", &[oid(1), oid(2), oid(3)])).unwrap();
        assert_eq!(batcher.pending(), [oid(3)]);
        batcher.flush().unwrap();
        assert!(batcher.pending().is_empty());

        assert_eq!(batcher.finish().batches, 2);
        assert_eq!(fetcher.batches, vec![vec![oid(1), oid(2)], vec![oid(3)]]);
    }

    #[test]
    fn test_fetch_failure_clears_and_propagates() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);
        fetcher.fail = true;

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 2);
        let err = batcher
            .observe(&blobs("a", &[oid(1), oid(2), oid(3)]))
            .unwrap_err();

        assert!(matches!(err, Error::Fetch { count: 2, .. }));
        assert!(batcher.pending().is_empty());
        drop(batcher);
        assert_eq!(store.refreshes, 0);
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let disk: Disk = Rc::default();
        let mut store = FakeStore::new(&disk);
        let mut fetcher = FakeFetcher::new(&disk);

        let mut batcher = BackfillBatcher::new(&mut store, &mut fetcher, 0);
        batcher.observe(&blobs("a", &[oid(1)])).unwrap();
        assert_eq!(batcher.finish().batches, 1);
    }
}

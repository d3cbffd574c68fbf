//! Prefetch-safe object metadata

use crate::error::{Error, NotFound};
use crate::model::{ObjectId, ObjectInfo};

use super::pack::PackSizeIndex;

/// Metadata lookups against local storage.
///
/// A lookup must never reach out to a remote: an object that is not stored
/// locally is reported as `NotFound`.
pub trait ObjectInfoSource {
    fn object_info(&self, id: &ObjectId) -> Result<ObjectInfo, NotFound>;

    /// Re-scan backing storage so objects added since the last scan are seen
    fn refresh(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Object metadata backed by a gix object database.
///
/// gix never lazily fetches from a promisor, so every header lookup is
/// prefetch-safe.
pub struct GixObjectStore {
    repo: gix::Repository,
    pack: PackSizeIndex,
}

impl GixObjectStore {
    pub fn new(repo: gix::Repository) -> Self {
        let store = repo.objects.store_ref();
        let mut dirs = vec![store.path().to_path_buf()];
        match store.alternate_db_paths() {
            Ok(alternates) => dirs.extend(alternates),
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable alternates"),
        }
        let pack = PackSizeIndex::load(dirs, repo.object_hash());
        tracing::debug!(packed = pack.len(), "loaded pack size index");
        Self { repo, pack }
    }
}

impl ObjectInfoSource for GixObjectStore {
    fn object_info(&self, id: &ObjectId) -> Result<ObjectInfo, NotFound> {
        let header = match self.repo.try_find_header(*id) {
            Ok(Some(header)) => header,
            Ok(None) => return Err(NotFound(*id)),
            Err(err) => {
                tracing::debug!(%id, error = %err, "object header lookup failed");
                return Err(NotFound(*id));
            }
        };

        Ok(ObjectInfo {
            kind: header.kind().into(),
            size: header.size(),
            disk_size: self.pack.size_of(id).unwrap_or(0),
        })
    }

    fn refresh(&mut self) -> Result<(), Error> {
        let added = self.pack.rescan();
        tracing::debug!(added, packed = self.pack.len(), "rescanned packs");
        Ok(())
    }
}

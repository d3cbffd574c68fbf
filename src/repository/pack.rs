//! On-disk object sizes
//!
//! A packed object's size is the gap between its entry offset and the next
//! one in the same pack (the trailing checksum bounds the last entry). A
//! loose object's size is its file length.
//!
//! The repository's own object directory is searched first, then its
//! alternates in order.

use anyhow::{Context, Result};
use gix::ObjectId;
use gix_pack::{data, index};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

pub struct PackSizeIndex {
    objects_dirs: Vec<PathBuf>,
    hash_kind: gix_hash::Kind,
    /// `.idx` files already folded into `packed`
    indexed: FxHashSet<PathBuf>,
    packed: FxHashMap<ObjectId, u64>,
}

impl PackSizeIndex {
    pub fn load(objects_dirs: Vec<PathBuf>, hash_kind: gix_hash::Kind) -> Self {
        let mut index = Self {
            objects_dirs,
            hash_kind,
            indexed: FxHashSet::default(),
            packed: FxHashMap::default(),
        };
        index.rescan();
        index
    }

    /// Index packs that appeared since the last scan. Returns how many
    /// new packs were read.
    pub fn rescan(&mut self) -> usize {
        let fresh: Vec<PathBuf> = self
            .objects_dirs
            .iter()
            .filter_map(|dir| std::fs::read_dir(dir.join("pack")).ok())
            .flat_map(|dir| dir.flatten().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "idx"))
            .filter(|path| !self.indexed.contains(path))
            .collect();

        let mut added = 0;
        for idx_path in fresh {
            match entry_sizes(&idx_path, self.hash_kind) {
                Ok(sizes) => {
                    // An earlier directory wins for objects stored twice
                    for (oid, size) in sizes {
                        self.packed.entry(oid).or_insert(size);
                    }
                    self.indexed.insert(idx_path);
                    added += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        pack = %idx_path.display(),
                        error = %err,
                        "skipping unreadable pack"
                    );
                }
            }
        }
        added
    }

    /// Bytes `oid` occupies locally, `None` when it is not stored here
    pub fn size_of(&self, oid: &gix::oid) -> Option<u64> {
        self.packed.get(oid).copied().or_else(|| {
            self.objects_dirs
                .iter()
                .find_map(|dir| std::fs::metadata(loose_path(dir, oid)).ok())
                .map(|meta| meta.len())
        })
    }

    /// Number of packed objects indexed
    pub fn len(&self) -> usize {
        self.packed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packed.is_empty()
    }
}

fn entry_sizes(idx_path: &Path, hash_kind: gix_hash::Kind) -> Result<Vec<(ObjectId, u64)>> {
    let pack_path = idx_path.with_extension("pack");
    let idx = index::File::at(idx_path, hash_kind)
        .with_context(|| format!("reading {}", idx_path.display()))?;
    let pack = data::File::at(&pack_path, hash_kind)
        .with_context(|| format!("reading {}", pack_path.display()))?;

    let mut offsets: Vec<(u64, ObjectId)> =
        idx.iter().map(|e| (e.pack_offset, e.oid)).collect();
    offsets.sort_unstable_by_key(|(offset, _)| *offset);
    offsets.push((pack.pack_end() as u64, ObjectId::null(hash_kind)));

    Ok(offsets
        .windows(2)
        .map(|pair| (pair[0].1, pair[1].0 - pair[0].0))
        .collect())
}

fn loose_path(objects_dir: &Path, oid: &gix::oid) -> PathBuf {
    let hex = oid.to_hex().to_string();
    objects_dir.join(&hex[..2]).join(&hex[2..])
}

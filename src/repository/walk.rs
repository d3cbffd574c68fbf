//! Path-aware reachability walk
//!
//! Visits every object reachable from a set of roots and hands them to a
//! sink grouped by (path, kind). Commits and tags are handed over as one
//! path-less group each; trees and blobs are batched per path, so each
//! path's ids arrive together. Ids are deduplicated across the whole walk.

use gix::bstr::{BStr, BString, ByteSlice};
use gix::prelude::FindExt;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Error;
use crate::model::{ObjectId, ObjectKind, TraversalUnit};

/// Path of the root tree of every commit
const ROOT_PATH: &str = "";
/// Pseudo-path grouping blobs that a ref or tag points at directly
const TAGGED_BLOBS_PATH: &str = "/tagged-blobs";

/// Receives the walk's units, one call per group.
///
/// Returning an error aborts the walk and the error is passed through.
pub trait UnitSink {
    fn observe(&mut self, unit: &TraversalUnit<'_>) -> Result<(), Error>;
}

impl<F> UnitSink for F
where
    F: FnMut(&TraversalUnit<'_>) -> Result<(), Error>,
{
    fn observe(&mut self, unit: &TraversalUnit<'_>) -> Result<(), Error> {
        self(unit)
    }
}

/// Restricts which paths the walk descends into or reports.
///
/// Directory paths end in `/`.
pub trait PathFilter {
    fn includes(&self, path: &str, is_dir: bool) -> bool;
}

/// Which object kinds the sink wants to hear about
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WalkWants {
    pub commits: bool,
    pub trees: bool,
    pub blobs: bool,
    pub tags: bool,
}

impl WalkWants {
    pub fn all() -> Self {
        Self {
            commits: true,
            trees: true,
            blobs: true,
            tags: true,
        }
    }

    pub fn blobs_only() -> Self {
        Self {
            commits: false,
            trees: false,
            blobs: true,
            tags: false,
        }
    }

    fn descends_trees(&self) -> bool {
        self.trees || self.blobs
    }
}

/// Walks objects reachable from `roots`, feeding groups to `sink`
pub trait ObjectWalker {
    fn walk(
        &self,
        roots: &[ObjectId],
        wants: WalkWants,
        sink: &mut dyn UnitSink,
    ) -> Result<(), Error>;
}

/// Buffer pool for reusing decode buffers across trees
#[derive(Default)]
struct BufferPool {
    buffers: Vec<Vec<u8>>,
}

impl BufferPool {
    fn take(&mut self) -> Vec<u8> {
        self.buffers
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(8 * 1024))
    }

    fn give(&mut self, mut buf: Vec<u8>) {
        buf.clear();
        self.buffers.push(buf);
    }
}

struct PathBatch {
    kind: ObjectKind,
    ids: Vec<ObjectId>,
}

#[derive(Default)]
struct WalkState {
    seen: FxHashSet<ObjectId>,
    commit_roots: Vec<ObjectId>,
    tags: Vec<ObjectId>,
    /// Keyed by raw path bytes; only labels are converted to text
    batches: FxHashMap<BString, PathBatch>,
    pending_paths: Vec<BString>,
    buf_pool: BufferPool,
}

impl WalkState {
    fn enqueue(&mut self, path: &BStr, kind: ObjectKind, id: ObjectId) {
        match self.batches.get_mut(path) {
            Some(batch) => batch.ids.push(id),
            None => {
                let path = path.to_owned();
                self.pending_paths.push(path.clone());
                self.batches.insert(path, PathBatch { kind, ids: vec![id] });
            }
        }
    }
}

/// `ObjectWalker` over a gix repository.
///
/// Objects absent from local storage are not descended into; a missing blob
/// is still reported, since only its id is needed.
pub struct PathWalk {
    repo: gix::Repository,
    filter: Option<Box<dyn PathFilter>>,
}

impl PathWalk {
    pub fn new(repo: gix::Repository) -> Self {
        Self { repo, filter: None }
    }

    pub fn with_filter(mut self, filter: Box<dyn PathFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sort a root into commits, tags, trees or blobs, peeling tag chains
    fn add_root(&self, root: ObjectId, state: &mut WalkState) -> Result<(), Error> {
        let mut next = Some(root);
        while let Some(id) = next.take() {
            let header = match self.repo.try_find_header(id).map_err(Error::walk)? {
                Some(header) => header,
                None => {
                    tracing::debug!(%id, "root object missing locally");
                    return Ok(());
                }
            };

            match ObjectKind::from(header.kind()) {
                ObjectKind::Commit => {
                    if state.seen.insert(id) {
                        state.commit_roots.push(id);
                    }
                }
                ObjectKind::Tag => {
                    if !state.seen.insert(id) {
                        return Ok(());
                    }
                    state.tags.push(id);
                    let mut buf = state.buf_pool.take();
                    let target = self
                        .repo
                        .objects
                        .find_tag(&id, &mut buf)
                        .map_err(Error::walk)?
                        .target();
                    state.buf_pool.give(buf);
                    next = Some(target);
                }
                ObjectKind::Tree => {
                    if state.seen.insert(id) {
                        state.enqueue(ROOT_PATH.into(), ObjectKind::Tree, id);
                    }
                }
                ObjectKind::Blob => {
                    if state.seen.insert(id) {
                        state.enqueue(TAGGED_BLOBS_PATH.into(), ObjectKind::Blob, id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Rev-walk all commits and queue their root trees
    fn walk_commits(&self, state: &mut WalkState) -> Result<Vec<ObjectId>, Error> {
        let mut commits = Vec::new();
        if state.commit_roots.is_empty() {
            return Ok(commits);
        }

        let roots = std::mem::take(&mut state.commit_roots);
        let walk = self.repo.rev_walk(roots).all().map_err(Error::walk)?;
        let mut buf = state.buf_pool.take();
        for info in walk {
            let id = info.map_err(Error::walk)?.id;
            commits.push(id);

            let tree = self
                .repo
                .objects
                .find_commit(&id, &mut buf)
                .map_err(Error::walk)?
                .tree();
            if state.seen.insert(tree) {
                state.enqueue(ROOT_PATH.into(), ObjectKind::Tree, tree);
            }
        }
        state.buf_pool.give(buf);

        Ok(commits)
    }

    /// Queue the entries of one tree under their child paths
    fn expand_tree(&self, id: &ObjectId, path: &BStr, state: &mut WalkState) -> Result<(), Error> {
        if !self.repo.has_object(id) {
            tracing::debug!(%id, %path, "tree missing locally, not descending");
            return Ok(());
        }

        let mut buf = state.buf_pool.take();
        let tree = match self.repo.objects.find_tree(id, &mut buf) {
            Ok(tree) => tree,
            Err(err) => return Err(Error::walk(err)),
        };

        let mut child = BString::from(Vec::with_capacity(path.len() + 64));
        for entry in tree.entries.iter() {
            child.clear();
            child.extend_from_slice(path);
            child.extend_from_slice(entry.filename);

            let kind = if entry.mode.is_tree() {
                child.push(b'/');
                ObjectKind::Tree
            } else if entry.mode.is_blob() || entry.mode.is_link() {
                ObjectKind::Blob
            } else {
                // gitlinks point into another repository
                continue;
            };

            if let Some(filter) = &self.filter {
                if !filter.includes(&child.to_str_lossy(), kind == ObjectKind::Tree) {
                    continue;
                }
            }

            let oid = entry.oid.to_owned();
            if state.seen.insert(oid) {
                state.enqueue(child.as_bstr(), kind, oid);
            }
        }

        state.buf_pool.give(buf);
        Ok(())
    }
}

impl ObjectWalker for PathWalk {
    fn walk(
        &self,
        roots: &[ObjectId],
        wants: WalkWants,
        sink: &mut dyn UnitSink,
    ) -> Result<(), Error> {
        let mut state = WalkState::default();

        for root in roots {
            self.add_root(*root, &mut state)?;
        }

        let commits = self.walk_commits(&mut state)?;
        tracing::debug!(commits = commits.len(), "commit walk complete");
        if wants.commits && !commits.is_empty() {
            sink.observe(&TraversalUnit::new(None, &commits, ObjectKind::Commit))?;
        }
        drop(commits);

        if wants.descends_trees() {
            while let Some(path) = state.pending_paths.pop() {
                let Some(batch) = state.batches.remove(&path) else {
                    continue;
                };

                let text = path.to_str_lossy();
                let label = Some(&*text);
                match batch.kind {
                    ObjectKind::Tree => {
                        if wants.trees {
                            let unit = TraversalUnit::new(label, &batch.ids, ObjectKind::Tree);
                            sink.observe(&unit)?;
                        }
                        for id in &batch.ids {
                            self.expand_tree(id, path.as_bstr(), &mut state)?;
                        }
                    }
                    ObjectKind::Blob => {
                        if wants.blobs {
                            let unit = TraversalUnit::new(label, &batch.ids, ObjectKind::Blob);
                            sink.observe(&unit)?;
                        }
                    }
                    ObjectKind::Commit | ObjectKind::Tag => {}
                }
            }
        }

        if wants.tags && !state.tags.is_empty() {
            sink.observe(&TraversalUnit::new(None, &state.tags, ObjectKind::Tag))?;
        }

        Ok(())
    }
}

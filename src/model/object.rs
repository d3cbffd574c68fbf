//! Object identity and the units produced by a path walk

use serde::Serialize;

pub use gix::ObjectId;

/// The four kinds of object a repository stores
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Commit,
        ObjectKind::Tree,
        ObjectKind::Blob,
        ObjectKind::Tag,
    ];

    /// Position of this kind in per-type arrays
    pub fn index(self) -> usize {
        match self {
            ObjectKind::Commit => 0,
            ObjectKind::Tree => 1,
            ObjectKind::Blob => 2,
            ObjectKind::Tag => 3,
        }
    }

    /// Plural label used for per-type totals
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Commit => "Commits",
            ObjectKind::Tree => "Trees",
            ObjectKind::Blob => "Blobs",
            ObjectKind::Tag => "Tags",
        }
    }

    /// Whether units of this kind carry a path
    pub fn has_path(self) -> bool {
        matches!(self, ObjectKind::Tree | ObjectKind::Blob)
    }
}

impl From<gix::object::Kind> for ObjectKind {
    fn from(kind: gix::object::Kind) -> Self {
        match kind {
            gix::object::Kind::Commit => ObjectKind::Commit,
            gix::object::Kind::Tree => ObjectKind::Tree,
            gix::object::Kind::Blob => ObjectKind::Blob,
            gix::object::Kind::Tag => ObjectKind::Tag,
        }
    }
}

/// Metadata answered by a prefetch-safe lookup
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ObjectInfo {
    pub kind: ObjectKind,
    /// Size after inflating (and resolving deltas)
    pub size: u64,
    /// Bytes the object occupies in local storage, 0 if not materialized
    pub disk_size: u64,
}

/// All ids of one kind sharing a path, as handed to a walk sink.
///
/// Borrowed for the duration of a single callback.
#[derive(Debug, Clone, Copy)]
pub struct TraversalUnit<'a> {
    pub path: Option<&'a str>,
    pub ids: &'a [ObjectId],
    pub kind: ObjectKind,
}

impl<'a> TraversalUnit<'a> {
    pub fn new(path: Option<&'a str>, ids: &'a [ObjectId], kind: ObjectKind) -> Self {
        Self { path, ids, kind }
    }

    /// Label to aggregate this unit under: its path, or the type name for
    /// path-less kinds
    pub fn label(&self) -> &'a str {
        match self.path {
            Some(path) if self.kind.has_path() => path,
            _ => self.kind.label(),
        }
    }
}

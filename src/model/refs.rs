use serde::Serialize;

use super::object::ObjectId;

/// Category of an enumerated reference
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RefKind {
    Branch,
    Tag,
    Remote,
    Other,
    Detached,
    Unknown,
}

impl RefKind {
    /// Classify a full reference name by its namespace
    pub fn from_name(name: &str) -> Self {
        if name == "HEAD" {
            RefKind::Detached
        } else if name.starts_with("refs/heads/") {
            RefKind::Branch
        } else if name.starts_with("refs/tags/") {
            RefKind::Tag
        } else if name.starts_with("refs/remotes/") {
            RefKind::Remote
        } else if name.starts_with("refs/") {
            RefKind::Other
        } else {
            RefKind::Unknown
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RefRecord {
    pub name: String,
    pub kind: RefKind,
    pub object_id: ObjectId,
}

impl RefRecord {
    pub fn new(name: impl Into<String>, object_id: ObjectId) -> Self {
        let name = name.into();
        let kind = RefKind::from_name(&name);
        Self {
            name,
            kind,
            object_id,
        }
    }
}

/// Resolved choice of which ref kinds to enumerate
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize)]
pub struct RefSelection {
    /// Everything under `refs/`
    pub all: bool,
    pub branches: bool,
    pub tags: bool,
    pub remotes: bool,
    pub detached: bool,
    /// Notes and stashes
    pub other: bool,
}

impl RefSelection {
    /// Every kind, detached HEAD included
    pub fn everything() -> Self {
        Self {
            all: true,
            branches: true,
            tags: true,
            remotes: true,
            detached: true,
            other: true,
        }
    }

    /// All namespaces under `refs/`, without HEAD
    pub fn all_namespaces() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn wants_branches(&self) -> bool {
        self.all || self.branches
    }

    pub fn wants_tags(&self) -> bool {
        self.all || self.tags
    }

    pub fn wants_remotes(&self) -> bool {
        self.all || self.remotes
    }

    /// Name prefixes to request from the ref store, `HEAD` first if wanted
    pub fn patterns(&self) -> Vec<&'static str> {
        let mut patterns = Vec::new();
        if self.detached {
            patterns.push("HEAD");
        }
        if self.all {
            patterns.push("refs/");
            return patterns;
        }
        if self.branches {
            patterns.push("refs/heads/");
        }
        if self.tags {
            patterns.push("refs/tags/");
        }
        if self.remotes {
            patterns.push("refs/remotes/");
        }
        if self.other {
            patterns.push("refs/notes/");
            patterns.push("refs/stash/");
        }
        patterns
    }
}

/// Whether `name` is selected by `pattern`: an exact match, or a prefix match
/// on a pattern ending in `/`. `refs/stash/` also selects `refs/stash` itself.
pub fn pattern_matches(pattern: &str, name: &str) -> bool {
    if name == pattern {
        return true;
    }
    match pattern.strip_suffix('/') {
        Some(dir) => name.starts_with(pattern) || name == dir,
        None => false,
    }
}

/// Ref census counters
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct RefSummary {
    pub refs_nr: u64,
    pub branches_nr: u64,
    pub remote_refs_nr: u64,
    pub tags_nr: u64,
    pub tags_annotated_nr: u64,
    pub others_nr: u64,
    pub unknown_nr: u64,
}

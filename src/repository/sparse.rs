//! Cone-mode sparse-checkout patterns
//!
//! A cone-mode pattern file only ever contains these line shapes:
//!
//! ```text
//! /*            files at the root
//! !/*/          but no root directories, except:
//! /docs/        everything under docs/
//! /src/         src/ itself ...
//! !/src/*/      ... without its subdirectories, except:
//! /src/core/    everything under src/core/
//! ```

use rustc_hash::FxHashSet;
use std::path::Path;

use crate::error::Error;

use super::walk::PathFilter;

#[derive(Debug, Default, Clone)]
pub struct SparsePatterns {
    /// Directories included with everything below them
    recursive: FxHashSet<String>,
    /// Directories whose immediate files are included
    parents: FxHashSet<String>,
}

impl SparsePatterns {
    /// Load `info/sparse-checkout` from a git directory
    pub fn load(git_dir: &Path) -> Result<Self, Error> {
        let file = git_dir.join("info").join("sparse-checkout");
        let text = std::fs::read_to_string(&file)
            .map_err(|err| Error::SparseCheckout(format!("{}: {err}", file.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut dirs = FxHashSet::default();
        let mut parents = FxHashSet::default();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line == "/*" || line == "!/*/" {
                continue;
            }
            if let Some(dir) = line
                .strip_prefix("!/")
                .and_then(|rest| rest.strip_suffix("/*/"))
            {
                parents.insert(dir.to_owned());
            } else if let Some(dir) = line
                .strip_prefix('/')
                .and_then(|rest| rest.strip_suffix('/'))
                .filter(|dir| !dir.is_empty() && !dir.contains('*'))
            {
                dirs.insert(dir.to_owned());
            } else {
                return Err(Error::SparseCheckout(format!(
                    "pattern '{line}' is not a cone-mode pattern; only cone mode is supported"
                )));
            }
        }

        let recursive = dirs.difference(&parents).cloned().collect();
        Ok(Self { recursive, parents })
    }

    fn under_recursive(&self, dir: &str) -> bool {
        let mut current = dir;
        loop {
            if self.recursive.contains(current) {
                return true;
            }
            match current.rsplit_once('/') {
                Some((parent, _)) => current = parent,
                None => return false,
            }
        }
    }

    fn leads_to_included(&self, dir: &str) -> bool {
        self.recursive
            .iter()
            .chain(self.parents.iter())
            .any(|entry| {
                entry.len() > dir.len()
                    && entry.starts_with(dir)
                    && entry.as_bytes()[dir.len()] == b'/'
            })
    }
}

impl PathFilter for SparsePatterns {
    fn includes(&self, path: &str, is_dir: bool) -> bool {
        if is_dir {
            let dir = path.trim_end_matches('/');
            return self.parents.contains(dir)
                || self.under_recursive(dir)
                || self.leads_to_included(dir);
        }

        match path.rsplit_once('/') {
            None => true,
            Some((parent, _)) => self.parents.contains(parent) || self.under_recursive(parent),
        }
    }
}

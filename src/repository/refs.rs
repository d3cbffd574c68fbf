//! Reference enumeration

use crate::error::Error;
use crate::model::{pattern_matches, RefKind, RefRecord};

/// Lists references whose names match any of the given patterns.
///
/// Patterns are either `HEAD` or a namespace prefix ending in `/`.
/// Symbolic references other than `HEAD` are skipped; `HEAD` is reported
/// with the id it resolves to.
pub trait RefSource {
    fn enumerate(&self, patterns: &[&str]) -> Result<Vec<RefRecord>, Error>;
}

pub struct GitRefSource {
    repo: gix::Repository,
}

impl GitRefSource {
    pub fn new(repo: gix::Repository) -> Self {
        Self { repo }
    }
}

impl RefSource for GitRefSource {
    fn enumerate(&self, patterns: &[&str]) -> Result<Vec<RefRecord>, Error> {
        let mut records = Vec::new();

        if patterns.contains(&"HEAD") {
            let head = self.repo.head().map_err(Error::refs)?;
            match head.id() {
                Some(id) => records.push(RefRecord {
                    name: "HEAD".to_owned(),
                    kind: RefKind::Detached,
                    object_id: id.detach(),
                }),
                None => tracing::debug!("HEAD is unborn, skipping"),
            }
        }

        let namespaces: Vec<&str> = patterns.iter().copied().filter(|p| *p != "HEAD").collect();
        if namespaces.is_empty() {
            return Ok(records);
        }

        let platform = self.repo.references().map_err(Error::refs)?;
        for reference in platform.all().map_err(Error::refs)? {
            let reference = reference.map_err(Error::refs)?;
            let name = reference.name().as_bstr().to_string();
            if !namespaces.iter().any(|p| pattern_matches(p, &name)) {
                continue;
            }
            let Some(id) = reference.target().try_id().map(ToOwned::to_owned) else {
                continue;
            };
            records.push(RefRecord::new(name, id));
        }

        Ok(records)
    }
}

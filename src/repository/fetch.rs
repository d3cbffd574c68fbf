//! Batch download of missing objects

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::Error;
use crate::model::ObjectId;

/// Downloads a batch of objects into local storage.
///
/// Any retrying is the fetcher's own business; an `Err` is final.
pub trait BatchFetcher {
    fn fetch(&mut self, ids: &[ObjectId]) -> Result<(), Error>;
}

/// Fetches from the repository's promisor remote by running `git fetch`
pub struct GitPromisorFetcher {
    git_dir: PathBuf,
    remote: Option<String>,
}

impl GitPromisorFetcher {
    pub fn new(git_dir: PathBuf, remote: Option<String>) -> Self {
        Self { git_dir, remote }
    }
}

impl BatchFetcher for GitPromisorFetcher {
    fn fetch(&mut self, ids: &[ObjectId]) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let remote = self.remote.as_deref().ok_or(Error::NoPromisorRemote)?;

        let mut child = Command::new("git")
            .arg("--git-dir")
            .arg(&self.git_dir)
            .args(["-c", "fetch.negotiationAlgorithm=noop", "fetch", remote])
            .args([
                "--no-tags",
                "--no-write-fetch-head",
                "--recurse-submodules=no",
                "--filter=blob:none",
                "--stdin",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut wants = String::with_capacity(ids.len() * 41);
            for id in ids {
                wants.push_str(&id.to_hex().to_string());
                wants.push('\n');
            }
            stdin.write_all(wants.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Fetch {
                remote: remote.to_owned(),
                count: ids.len(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        tracing::debug!(remote, count = ids.len(), "fetched batch");
        Ok(())
    }
}

//! Error types shared by the survey and backfill engines

use thiserror::Error;

use crate::model::ObjectId;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors. Any of these aborts the current run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {count} objects from remote '{remote}': {message}")]
    Fetch {
        remote: String,
        count: usize,
        message: String,
    },

    #[error("objects are missing but no promisor remote is configured")]
    NoPromisorRemote,

    #[error("object walk failed")]
    Walk(#[source] BoxedSource),

    #[error("failed to enumerate references")]
    Refs(#[source] BoxedSource),

    #[error("problem loading sparse-checkout: {0}")]
    SparseCheckout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn walk(err: impl Into<BoxedSource>) -> Self {
        Error::Walk(err.into())
    }

    pub fn refs(err: impl Into<BoxedSource>) -> Self {
        Error::Refs(err.into())
    }
}

/// A per-object lookup miss. Always recovered locally: it is counted as
/// missing by the survey and queued for download by the backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("object {0} is not available in local storage")]
pub struct NotFound(pub ObjectId);

// Library crate: the survey and backfill engines plus their gix collaborators

pub mod backfill;
pub mod error;
pub mod model;
pub mod repository;
pub mod survey;
pub mod view;

pub use error::{Error, NotFound};

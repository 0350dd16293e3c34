//! Shared error types for the services crate.

use thiserror::Error;

use watch_core::model::CourseError;

/// Errors emitted while loading the static course catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("could not read catalog file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Course(#[from] CourseError),
}

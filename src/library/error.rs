//! Error types for reading-list operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::shelf::ShelfError;
use crate::store::StoreError;

/// Errors surfaced by [`Library`](super::Library) operations.
///
/// Per-book download failures never appear here; they are classified into the
/// failed bucket and reported through the batch report.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Database read/write/edit failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Shelf import failure.
    #[error(transparent)]
    Shelf(#[from] ShelfError),

    /// Downloads were requested from a library built without an acquirer.
    #[error("this library was opened without catalog access and cannot download books")]
    NoAcquirer,

    /// The downloads directory could not be created.
    #[error("could not create downloads directory {path}: {source}")]
    DownloadsDir {
        /// Directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

//! Error types for catalog searches.

use thiserror::Error;

use crate::download::FetchError;

/// Errors that can occur while searching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured catalog base URL cannot be parsed.
    #[error("invalid catalog URL: {url}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },

    /// The catalog could not be reached (transport failure or error status).
    #[error("catalog unreachable: {0}")]
    Unreachable(#[from] FetchError),

    /// The results table is missing or has no rows.
    #[error("no catalog results for \"{query}\"")]
    NoResults {
        /// The query value that was sent.
        query: String,
    },
}

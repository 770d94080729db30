//! Error types for shelf import.

use thiserror::Error;

use crate::download::FetchError;

/// Errors that can occur while importing the reading shelf.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// The configured shelf URL cannot be parsed.
    #[error("invalid shelf URL: {url}\n  Suggestion: run `bookfetch url --set <shelf-url>`")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The shelf page could not be fetched (transport failure or error status).
    #[error("could not reach shelf: {0}")]
    Network(#[from] FetchError),
}

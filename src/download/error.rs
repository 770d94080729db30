//! Error types for the download module.
//!
//! [`FetchError`] is the shared HTTP capability error used by every component
//! that talks to the network. Transport failures and non-success statuses are
//! kept apart so callers can log them distinctly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a single HTTP GET.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    Build(String),

    /// Network-level error (DNS resolution, connection refused, TLS errors, timeouts).
    #[error("network error fetching {url}: {source}")]
    Transport {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl FetchError {
    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Returns the HTTP status when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Build(_) | Self::Transport { .. } => None,
        }
    }
}

/// Errors that can occur while walking mirrors for a single book.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A mirror or download request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The mirror landing page has no download anchor.
    #[error("no download link on mirror page {url}")]
    MissingDownloadLink {
        /// The landing page URL.
        url: String,
    },

    /// File system error while saving the book.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Neither catalog category produced a usable mirror link.
    #[error("no catalog entry matched \"{title}\" by {author}")]
    NoCandidates {
        /// Title that was searched.
        title: String,
        /// Author that was searched.
        author: String,
    },

    /// Every candidate mirror was tried without success.
    #[error("all {attempted} mirror(s) failed")]
    Exhausted {
        /// Number of candidate mirrors tried.
        attempted: usize,
    },
}

impl DownloadError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Bookfetch Core Library
//!
//! This library keeps a personal reading list in sync with local ebook files.
//! Books are imported from a public reading shelf, matched against a book
//! mirror catalog, and downloaded into a local directory while a small JSON
//! database records which books are pending, downloaded, or failed.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`store`] - JSON database with the pending/downloaded/failed buckets
//! - [`shelf`] - Shelf page fetching and row normalization
//! - [`catalog`] - Catalog search and result-row matching
//! - [`download`] - Shared HTTP client and mirror download execution
//! - [`library`] - Coordinator for import, batch download and manual edits

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod download;
mod html;
pub mod library;
pub mod shelf;
pub mod store;
pub mod user_agent;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogResolver, Category, DEFAULT_CATALOG_URL, MatchCriteria};
pub use download::{DownloadError, FetchError, HttpClient, MirrorDownloader};
pub use library::{
    BatchReport, BookAcquirer, CatalogAcquirer, DownloadOutcome, Library, LibraryError,
    MergeReport, OutcomeStatus,
};
pub use shelf::{ShelfError, ShelfImporter};
pub use store::{BookKey, BookRecord, Bucket, DEFAULT_CUTOFF_DATE, Document, Store, StoreError};

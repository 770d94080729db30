//! JSON-backed book database.
//!
//! The whole document is read, mutated in memory and rewritten on every
//! operation. Writes go to a sibling temporary file that is renamed over the
//! database, so a crash mid-write leaves the previous document intact.
//!
//! # On-disk format
//!
//! ```json
//! {
//!   "undownloaded_books": { "DuneFrank Herbert": { "title": "Dune", "author": "Frank Herbert", "date_added": "03-01-2024" } },
//!   "downloaded_books": {},
//!   "failed_books": {},
//!   "date_since_download": "01-01-2000"
//! }
//! ```

pub mod dates;
mod document;
mod error;
mod record;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, instrument};

use document::RawDocument;

pub use document::{Bucket, Document};
pub use error::StoreError;
pub use record::{BookKey, BookRecord, swap_author_order};

/// Default cutoff date written by `init` when none is given.
pub const DEFAULT_CUTOFF_DATE: &str = "01-01-2000";

/// Handle to the database file at a fixed path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates a handle; nothing is read until [`read`](Self::read).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a fresh document with empty buckets, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] when the directory or file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn initialize(&self, cutoff_date: NaiveDate) -> Result<Document, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::storage(parent, e))?;
        }
        let document = Document::new(cutoff_date);
        self.write(&document)?;
        Ok(document)
    }

    /// Reads and validates the whole document.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Storage`] when the file cannot be read
    /// - [`StoreError::Format`] when the content is not a valid document
    pub fn read(&self) -> Result<Document, StoreError> {
        let raw = fs::read(&self.path).map_err(|e| StoreError::storage(&self.path, e))?;
        let parsed: RawDocument = serde_json::from_slice(&raw).map_err(|e| {
            StoreError::format(format!("{}: {e}", self.path.display()))
        })?;
        let document = Document::from_raw(parsed)?;
        debug!(books = document.len(), "database loaded");
        Ok(document)
    }

    /// Replaces the whole document on disk.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Storage`] when the file cannot be written
    /// - [`StoreError::Format`] when two books would share one database key
    pub fn write(&self, document: &Document) -> Result<(), StoreError> {
        let raw = document.to_raw()?;
        let mut body = serde_json::to_vec_pretty(&raw)
            .map_err(|e| StoreError::format(format!("serialization failed: {e}")))?;
        body.push(b'\n');

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, &body).map_err(|e| StoreError::storage(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::storage(&self.path, e)
        })?;
        debug!(books = document.len(), path = %self.path.display(), "database written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| "database.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

//! Reading-list coordinator.
//!
//! Ties the shelf importer, the database and the book acquirer together.
//! Every operation follows the same shape: read the whole document, change it
//! in memory, write it back once.
//!
//! Book states move `pending -> {downloaded, failed}`. Failed books re-enter
//! the pipeline only through retry mode, which uses the failed bucket as its
//! input instead of the pending one.
//!
//! # Example
//!
//! ```no_run
//! use bookfetch_core::download::HttpClient;
//! use bookfetch_core::library::{CatalogAcquirer, Library};
//! use bookfetch_core::store::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let acquirer = CatalogAcquirer::with_client(client, "https://libgen.is")?;
//! let library = Library::new(Store::new("database.json"), "./books", Box::new(acquirer));
//! let report = library.process_downloads(false).await?;
//! println!("downloaded {}, failed {}", report.downloaded(), report.failed());
//! # Ok(())
//! # }
//! ```

mod acquirer;
mod error;
mod outcome;

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeDelta};
use futures_util::FutureExt;
use tracing::{debug, info, instrument, warn};

use crate::download::download_path_for;
use crate::shelf::ShelfImporter;
use crate::store::{BookKey, BookRecord, Bucket, Document, Store};

pub use acquirer::{BookAcquirer, CatalogAcquirer};
pub use error::LibraryError;
pub use outcome::{BatchReport, DownloadOutcome, MergeReport, OutcomeStatus};

/// Coordinates shelf imports, downloads and manual edits against one database.
///
/// A library built with [`offline`](Self::offline) has no acquirer: imports
/// and manual edits work, downloads fail with [`LibraryError::NoAcquirer`].
pub struct Library {
    store: Store,
    downloads_dir: PathBuf,
    acquirer: Option<Box<dyn BookAcquirer>>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .field("downloads_dir", &self.downloads_dir)
            .field("offline", &self.acquirer.is_none())
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        store: Store,
        downloads_dir: impl Into<PathBuf>,
        acquirer: Box<dyn BookAcquirer>,
    ) -> Self {
        Self {
            store,
            downloads_dir: downloads_dir.into(),
            acquirer: Some(acquirer),
        }
    }

    /// Creates a coordinator without network access to the catalog.
    #[must_use]
    pub fn offline(store: Store, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            downloads_dir: downloads_dir.into(),
            acquirer: None,
        }
    }

    /// The database handle.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Directory book files are saved into.
    #[must_use]
    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Fetches the shelf and adds every book not already tracked to the
    /// pending bucket.
    ///
    /// Books already present in any bucket are left untouched.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Shelf`] when the shelf cannot be fetched
    /// - [`LibraryError::Store`] when the database cannot be read or written
    #[instrument(skip(self, importer))]
    pub async fn import_and_merge(
        &self,
        importer: &ShelfImporter,
        shelf_url: &str,
    ) -> Result<MergeReport, LibraryError> {
        let imported = importer.fetch_shelf(shelf_url).await?;
        let mut document = self.store.read()?;
        let report = merge_imported(&mut document, imported);
        self.store.write(&document)?;
        info!(imported = report.imported, added = report.added, "shelf merged");
        Ok(report)
    }

    /// Downloads every book in the pending bucket, or the failed bucket when
    /// `retry_failed` is set.
    ///
    /// See [`process_downloads_with_progress`](Self::process_downloads_with_progress).
    ///
    /// # Errors
    ///
    /// Same as [`process_downloads_with_progress`](Self::process_downloads_with_progress).
    pub async fn process_downloads(&self, retry_failed: bool) -> Result<BatchReport, LibraryError> {
        self.process_downloads_with_progress(retry_failed, |_, _| {})
            .await
    }

    /// Downloads every book in the input bucket, calling `on_outcome` with
    /// each result and the input size.
    ///
    /// Per book, in key order:
    /// 1. Books added more than one day before the cutoff date move to the
    ///    downloaded bucket without any network traffic.
    /// 2. Otherwise the acquirer runs. Success moves the book to the
    ///    downloaded bucket with its timestamp and mirror link.
    /// 3. Any error or panic during acquisition moves that book, unchanged,
    ///    to the failed bucket. The batch continues.
    ///
    /// The document is written once at the end. An empty input bucket causes
    /// no write at all.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NoAcquirer`] when built with [`offline`](Self::offline)
    /// - [`LibraryError::Store`] when the database cannot be read or written
    /// - [`LibraryError::DownloadsDir`] when the downloads directory cannot be created
    #[instrument(skip(self, on_outcome), fields(downloads_dir = %self.downloads_dir.display()))]
    pub async fn process_downloads_with_progress<F>(
        &self,
        retry_failed: bool,
        mut on_outcome: F,
    ) -> Result<BatchReport, LibraryError>
    where
        F: FnMut(&DownloadOutcome, usize),
    {
        let acquirer = self.acquirer.as_deref().ok_or(LibraryError::NoAcquirer)?;
        let mut document = self.store.read()?;
        let input = if retry_failed {
            Bucket::Failed
        } else {
            Bucket::Pending
        };
        let records: Vec<BookRecord> = document.bucket(input).values().cloned().collect();
        let total = records.len();
        if records.is_empty() {
            info!(bucket = %input, "nothing to download");
            return Ok(BatchReport::default());
        }

        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|source| LibraryError::DownloadsDir {
                path: self.downloads_dir.clone(),
                source,
            })?;

        info!(bucket = %input, books = total, "starting downloads");
        let cutoff = document.cutoff_date();
        let mut report = BatchReport::default();
        for record in records {
            let outcome = if added_before_cutoff(record.date_added, cutoff) {
                info!(
                    title = %record.title,
                    "not downloaded because it was added before the cutoff date"
                );
                DownloadOutcome::skipped(record.key())
            } else {
                self.acquire_one(acquirer, &record).await
            };
            apply_outcome(&mut document, input, &outcome)?;
            on_outcome(&outcome, total);
            report.outcomes.push(outcome);
        }

        self.store.write(&document)?;
        info!(
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            failed = report.failed(),
            total,
            "downloads finished"
        );
        Ok(report)
    }

    /// Runs the acquirer for one book, turning errors and panics into a failed
    /// outcome.
    async fn acquire_one(&self, acquirer: &dyn BookAcquirer, record: &BookRecord) -> DownloadOutcome {
        let key = record.key();
        let destination = download_path_for(&self.downloads_dir, &record.title);
        debug!(%key, destination = %destination.display(), "acquiring book");

        let attempt = AssertUnwindSafe(acquirer.acquire(record, &destination))
            .catch_unwind()
            .await;
        match attempt {
            Ok(Ok(link)) => DownloadOutcome::downloaded(key, link, Local::now().naive_local()),
            Ok(Err(error)) => {
                warn!(%key, error = %error, "download failed");
                DownloadOutcome::failed(key, error.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%key, panic = %message, "download attempt panicked");
                DownloadOutcome::failed(key, format!("download attempt panicked: {message}"))
            }
        }
    }

    /// Adds or replaces one book in `bucket`, removing it from any other
    /// bucket. Returns the bucket it was previously in.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Store`] wrapping `KeyCollision` when a different book
    ///   already uses the same database key
    /// - [`LibraryError::Store`] when the database cannot be read or written
    pub fn add_book(
        &self,
        title: &str,
        author: &str,
        date_added: Option<NaiveDate>,
        bucket: Bucket,
    ) -> Result<Option<Bucket>, LibraryError> {
        let mut document = self.store.read()?;
        let previous = document.upsert(bucket, BookRecord::new(title, author, date_added))?;
        self.store.write(&document)?;
        info!(%title, %author, %bucket, "book added");
        Ok(previous)
    }

    /// Removes one book from whichever bucket holds it, falling back to the
    /// other author name order.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Store`] wrapping `NotFound` when neither author form is stored
    /// - [`LibraryError::Store`] when the database cannot be read or written
    pub fn remove_book(&self, title: &str, author: &str) -> Result<(Bucket, BookRecord), LibraryError> {
        let mut document = self.store.read()?;
        let removed = document.remove(title, author)?;
        self.store.write(&document)?;
        info!(title = %removed.1.title, author = %removed.1.author, bucket = %removed.0, "book removed");
        Ok(removed)
    }

    /// Lists tracked books, optionally restricted to one bucket.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Store`] when the database cannot be read.
    pub fn list(&self, filter: Option<Bucket>) -> Result<Vec<(Bucket, BookRecord)>, LibraryError> {
        let document = self.store.read()?;
        Ok(document
            .records()
            .filter(|(bucket, _)| filter.is_none_or(|wanted| wanted == *bucket))
            .map(|(bucket, record)| (bucket, record.clone()))
            .collect())
    }
}

/// Adds every imported book whose key is not tracked yet to the pending
/// bucket.
///
/// A book that would share its database key with a tracked book, or with an
/// earlier shelf entry, is skipped and counted in [`MergeReport::skipped`].
pub fn merge_imported(
    document: &mut Document,
    imported: BTreeMap<BookKey, BookRecord>,
) -> MergeReport {
    let mut report = MergeReport {
        imported: imported.len(),
        ..MergeReport::default()
    };
    for (key, record) in imported {
        if document.contains(&key) {
            continue;
        }
        match document.upsert(Bucket::Pending, record) {
            Ok(_) => {
                debug!(%key, "new shelf entry");
                report.added += 1;
            }
            Err(error) => {
                warn!(%key, %error, "skipping shelf entry");
                report.skipped += 1;
            }
        }
    }
    report
}

/// True when the book was added more than one day before `cutoff`.
fn added_before_cutoff(date_added: Option<NaiveDate>, cutoff: NaiveDate) -> bool {
    date_added.is_some_and(|added| cutoff.signed_duration_since(added) > TimeDelta::days(1))
}

fn apply_outcome(
    document: &mut Document,
    input: Bucket,
    outcome: &DownloadOutcome,
) -> Result<(), LibraryError> {
    match outcome.status {
        OutcomeStatus::SkippedBeforeCutoff => {
            document.move_to(&outcome.key, input, Bucket::Completed)?;
        }
        OutcomeStatus::Downloaded => {
            let record = document.move_to(&outcome.key, input, Bucket::Completed)?;
            record.date_downloaded = outcome.timestamp;
            record.download_link.clone_from(&outcome.resolved_link);
        }
        OutcomeStatus::Failed => {
            document.move_to(&outcome.key, input, Bucket::Failed)?;
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::download::DownloadError;

    enum Behavior {
        Save(&'static str),
        Fail,
        Panic,
    }

    #[derive(Default)]
    struct FakeAcquirer {
        behaviors: HashMap<&'static str, Behavior>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeAcquirer {
        fn with(mut self, title: &'static str, behavior: Behavior) -> Self {
            self.behaviors.insert(title, behavior);
            self
        }
    }

    #[async_trait]
    impl BookAcquirer for FakeAcquirer {
        async fn acquire(
            &self,
            record: &BookRecord,
            destination: &Path,
        ) -> Result<String, DownloadError> {
            self.calls.lock().unwrap().push(record.title.clone());
            match self.behaviors.get(record.title.as_str()) {
                Some(Behavior::Save(link)) => {
                    tokio::fs::write(destination, b"epub").await.unwrap();
                    Ok((*link).to_string())
                }
                Some(Behavior::Panic) => panic!("mirror parser blew up"),
                Some(Behavior::Fail) | None => Err(DownloadError::Exhausted { attempted: 1 }),
            }
        }
    }

    fn date(month: u32, day: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn library_with(temp: &TempDir, cutoff: NaiveDate, acquirer: FakeAcquirer) -> Library {
        let store = Store::new(temp.path().join("database.json"));
        store.initialize(cutoff).unwrap();
        Library::new(store, temp.path().join("books"), Box::new(acquirer))
    }

    #[test]
    fn test_added_before_cutoff_needs_more_than_one_day() {
        let cutoff = date(1, 10, 2024);
        assert!(added_before_cutoff(Some(date(1, 8, 2024)), cutoff));
        assert!(!added_before_cutoff(Some(date(1, 9, 2024)), cutoff));
        assert!(!added_before_cutoff(Some(date(1, 12, 2024)), cutoff));
        assert!(!added_before_cutoff(None, cutoff));
    }

    #[test]
    fn test_merge_imported_skips_tracked_books() {
        let mut document = Document::new(date(1, 1, 2000));
        let dune = BookRecord::new("Dune", "Herbert, Frank", Some(date(3, 1, 2024)));
        document.upsert(Bucket::Failed, dune.clone()).unwrap();

        let emma = BookRecord::new("Emma", "Austen, Jane", Some(date(2, 1, 2024)));
        let imported: BTreeMap<_, _> = [dune.clone(), emma.clone()]
            .into_iter()
            .map(|r| (r.key(), r))
            .collect();

        let report = merge_imported(&mut document, imported);
        assert_eq!(
            report,
            MergeReport {
                imported: 2,
                added: 1,
                skipped: 0
            }
        );
        assert_eq!(document.find(&dune.key()).map(|(b, _)| b), Some(Bucket::Failed));
        assert_eq!(document.find(&emma.key()).map(|(b, _)| b), Some(Bucket::Pending));
    }

    #[test]
    fn test_merge_imported_skips_colliding_entries() {
        let mut document = Document::new(date(1, 1, 2000));
        document
            .upsert(Bucket::Completed, BookRecord::new("Emma", "Jane Austen", None))
            .unwrap();

        let imported: BTreeMap<_, _> = [
            BookRecord::new("Dune", "Herbert, Frank", Some(date(3, 1, 2024))),
            BookRecord::new("AB", "C", None),
            BookRecord::new("A", "BC", None),
            BookRecord::new("EmmaJane", " Austen", None),
        ]
        .into_iter()
        .map(|r| (r.key(), r))
        .collect();

        let report = merge_imported(&mut document, imported);
        assert_eq!(report.imported, 4);
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 2);
        assert!(document.contains(&BookKey::new("Dune", "Herbert, Frank")));
        // "A"/"BC" sorts before "AB"/"C", so it is the one kept.
        assert!(document.contains(&BookKey::new("A", "BC")));
        assert!(!document.contains(&BookKey::new("AB", "C")));
        assert!(document.to_raw().is_ok());
    }

    #[test]
    fn test_add_book_rejects_colliding_key() {
        let temp = TempDir::new().unwrap();
        let library = library_with(&temp, date(1, 1, 2000), FakeAcquirer::default());
        library.add_book("AB", "C", None, Bucket::Pending).unwrap();

        let err = library.add_book("A", "BC", None, Bucket::Failed).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Store(crate::store::StoreError::KeyCollision { .. })
        ));
        assert_eq!(library.list(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_library_edits_but_refuses_downloads() {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path().join("database.json"));
        store.initialize(date(1, 1, 2000)).unwrap();
        let library = Library::offline(store, temp.path().join("books"));

        library
            .add_book("Dune", "Herbert, Frank", None, Bucket::Pending)
            .unwrap();
        assert_eq!(library.list(Some(Bucket::Pending)).unwrap().len(), 1);

        let err = library.process_downloads(false).await.unwrap_err();
        assert!(matches!(err, LibraryError::NoAcquirer));
        assert_eq!(library.list(Some(Bucket::Pending)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_process_downloads_classifies_each_book() {
        let temp = TempDir::new().unwrap();
        let acquirer = FakeAcquirer::default()
            .with("Dune", Behavior::Save("http://mirror.example/dune"))
            .with("Emma", Behavior::Fail);
        let library = library_with(&temp, date(1, 1, 2000), acquirer);
        library
            .add_book("Dune", "Herbert, Frank", Some(date(3, 1, 2024)), Bucket::Pending)
            .unwrap();
        library
            .add_book("Emma", "Austen, Jane", Some(date(2, 1, 2024)), Bucket::Pending)
            .unwrap();

        let report = library.process_downloads(false).await.unwrap();
        assert_eq!(report.downloaded(), 1);
        assert_eq!(report.failed(), 1);

        let document = library.store().read().unwrap();
        assert!(document.bucket(Bucket::Pending).is_empty());
        let dune = &document.bucket(Bucket::Completed)[&BookKey::new("Dune", "Herbert, Frank")];
        assert_eq!(dune.download_link.as_deref(), Some("http://mirror.example/dune"));
        assert!(dune.date_downloaded.is_some());
        let emma = &document.bucket(Bucket::Failed)[&BookKey::new("Emma", "Austen, Jane")];
        assert_eq!(emma.download_link, None);
        assert!(temp.path().join("books").join("Dune.epub").exists());
    }

    #[tokio::test]
    async fn test_panicking_acquirer_fails_only_that_book() {
        let temp = TempDir::new().unwrap();
        let acquirer = FakeAcquirer::default()
            .with("Anathem", Behavior::Panic)
            .with("Dune", Behavior::Save("http://mirror.example/dune"));
        let library = library_with(&temp, date(1, 1, 2000), acquirer);
        library.add_book("Anathem", "Stephenson, Neal", None, Bucket::Pending).unwrap();
        library.add_book("Dune", "Herbert, Frank", None, Bucket::Pending).unwrap();

        let report = library.process_downloads(false).await.unwrap();
        let anathem = report
            .outcomes
            .iter()
            .find(|o| o.key.title() == "Anathem")
            .unwrap();
        assert_eq!(anathem.status, OutcomeStatus::Failed);
        assert!(anathem.error.as_deref().unwrap().contains("mirror parser blew up"));
        assert_eq!(report.downloaded(), 1);
    }

    #[tokio::test]
    async fn test_cutoff_skip_never_calls_acquirer() {
        let temp = TempDir::new().unwrap();
        let library = library_with(&temp, date(6, 1, 2024), FakeAcquirer::default());
        library
            .add_book("Dune", "Herbert, Frank", Some(date(1, 1, 2024)), Bucket::Pending)
            .unwrap();

        let report = library.process_downloads(false).await.unwrap();
        assert_eq!(report.skipped(), 1);
        let document = library.store().read().unwrap();
        let dune = &document.bucket(Bucket::Completed)[&BookKey::new("Dune", "Herbert, Frank")];
        assert_eq!(dune.date_downloaded, None);
    }

    #[tokio::test]
    async fn test_empty_input_bucket_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let library = library_with(&temp, date(1, 1, 2000), FakeAcquirer::default());
        library.add_book("Dune", "Herbert, Frank", None, Bucket::Failed).unwrap();
        let before = std::fs::read(library.store().path()).unwrap();

        let report = library.process_downloads(false).await.unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(std::fs::read(library.store().path()).unwrap(), before);
        assert!(!temp.path().join("books").exists());
    }

    #[tokio::test]
    async fn test_retry_reads_failed_bucket_only() {
        let temp = TempDir::new().unwrap();
        let acquirer = FakeAcquirer::default().with("Dune", Behavior::Save("http://m.example/d"));
        let library = library_with(&temp, date(1, 1, 2000), acquirer);
        library.add_book("Dune", "Herbert, Frank", None, Bucket::Failed).unwrap();
        library.add_book("Emma", "Austen, Jane", None, Bucket::Pending).unwrap();

        let mut seen = Vec::new();
        let report = library
            .process_downloads_with_progress(true, |outcome, total| {
                seen.push((outcome.key.title().to_string(), total));
            })
            .await
            .unwrap();
        assert_eq!(report.downloaded(), 1);
        assert_eq!(seen, vec![("Dune".to_string(), 1)]);

        let listed = library.list(Some(Bucket::Pending)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1.title, "Emma");
    }

    #[test]
    fn test_remove_book_with_swapped_author() {
        let temp = TempDir::new().unwrap();
        let library = library_with(&temp, date(1, 1, 2000), FakeAcquirer::default());
        library.add_book("Dune", "Frank Herbert", None, Bucket::Completed).unwrap();

        let (bucket, record) = library.remove_book("Dune", "Herbert, Frank").unwrap();
        assert_eq!(bucket, Bucket::Completed);
        assert_eq!(record.author, "Frank Herbert");
        assert!(library.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_add_book_moves_between_buckets() {
        let temp = TempDir::new().unwrap();
        let library = library_with(&temp, date(1, 1, 2000), FakeAcquirer::default());
        assert_eq!(
            library.add_book("Dune", "Herbert, Frank", None, Bucket::Pending).unwrap(),
            None
        );
        assert_eq!(
            library.add_book("Dune", "Herbert, Frank", None, Bucket::Completed).unwrap(),
            Some(Bucket::Pending)
        );
        let all = library.list(None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, Bucket::Completed);
    }
}

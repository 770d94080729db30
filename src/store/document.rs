//! The in-memory database document and its bucket operations.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;
use super::error::StoreError;
use super::record::{BookKey, BookRecord};

/// One of the three partitions a book can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Waiting to be downloaded.
    Pending,
    /// Downloaded, or owned before tracking began.
    Completed,
    /// Every mirror failed.
    Failed,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Failed];

    /// Returns the user-facing label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "undownloaded",
            Self::Completed => "downloaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" | "undownloaded" => Ok(Self::Pending),
            "completed" | "downloaded" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid bucket: {s}")),
        }
    }
}

/// The whole database: three buckets plus the cutoff date.
///
/// Every key lives in at most one bucket. The mutating methods keep that
/// invariant; callers never touch the maps directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pending: BTreeMap<BookKey, BookRecord>,
    completed: BTreeMap<BookKey, BookRecord>,
    failed: BTreeMap<BookKey, BookRecord>,
    cutoff_date: NaiveDate,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new(cutoff_date: NaiveDate) -> Self {
        Self {
            pending: BTreeMap::new(),
            completed: BTreeMap::new(),
            failed: BTreeMap::new(),
            cutoff_date,
        }
    }

    /// Books added more than one day before this date count as already owned.
    #[must_use]
    pub fn cutoff_date(&self) -> NaiveDate {
        self.cutoff_date
    }

    /// Read access to one bucket.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &BTreeMap<BookKey, BookRecord> {
        match bucket {
            Bucket::Pending => &self.pending,
            Bucket::Completed => &self.completed,
            Bucket::Failed => &self.failed,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BTreeMap<BookKey, BookRecord> {
        match bucket {
            Bucket::Pending => &mut self.pending,
            Bucket::Completed => &mut self.completed,
            Bucket::Failed => &mut self.failed,
        }
    }

    /// Finds the bucket and record for `key`.
    #[must_use]
    pub fn find(&self, key: &BookKey) -> Option<(Bucket, &BookRecord)> {
        Bucket::ALL
            .into_iter()
            .find_map(|bucket| self.bucket(bucket).get(key).map(|record| (bucket, record)))
    }

    /// Returns true if `key` is in any bucket.
    #[must_use]
    pub fn contains(&self, key: &BookKey) -> bool {
        self.find(key).is_some()
    }

    /// Total number of books across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.completed.len() + self.failed.len()
    }

    /// Returns true when every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every record with its bucket, bucket by bucket.
    pub fn records(&self) -> impl Iterator<Item = (Bucket, &BookRecord)> {
        Bucket::ALL
            .into_iter()
            .flat_map(move |bucket| self.bucket(bucket).values().map(move |record| (bucket, record)))
    }

    /// Returns the tracked key, other than `key` itself, that is saved under
    /// the same database key.
    #[must_use]
    pub fn colliding_key(&self, key: &BookKey) -> Option<&BookKey> {
        let storage_key = key.storage_key();
        Bucket::ALL
            .into_iter()
            .flat_map(|bucket| self.bucket(bucket).keys())
            .find(|tracked| *tracked != key && tracked.storage_key() == storage_key)
    }

    /// Inserts or replaces `record` in `bucket`, removing it from any other
    /// bucket first. Returns the bucket the key was previously in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::KeyCollision`] when a different book is already
    /// saved under the same database key. The document is left unchanged.
    pub fn upsert(&mut self, bucket: Bucket, record: BookRecord) -> Result<Option<Bucket>, StoreError> {
        let key = record.key();
        if self.colliding_key(&key).is_some() {
            return Err(StoreError::key_collision(&key));
        }
        let previous = self.remove_key(&key).map(|(previous, _)| previous);
        self.bucket_mut(bucket).insert(key, record);
        Ok(previous)
    }

    /// Removes `key` from whichever bucket holds it.
    pub fn remove_key(&mut self, key: &BookKey) -> Option<(Bucket, BookRecord)> {
        Bucket::ALL.into_iter().find_map(|bucket| {
            self.bucket_mut(bucket)
                .remove(key)
                .map(|record| (bucket, record))
        })
    }

    /// Removes the book matching `title` and `author` from whichever bucket
    /// holds it.
    ///
    /// When the exact author is not stored, the other name order is tried
    /// (`"Herbert, Frank"` for `"Frank Herbert"` and vice versa).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when neither form is stored.
    pub fn remove(&mut self, title: &str, author: &str) -> Result<(Bucket, BookRecord), StoreError> {
        let key = BookKey::new(title, author);
        if let Some(found) = self.remove_key(&key) {
            return Ok(found);
        }
        key.with_swapped_author()
            .and_then(|swapped| self.remove_key(&swapped))
            .ok_or_else(|| StoreError::not_found(title, author))
    }

    /// Moves `key` from `from` to `to` and returns the moved record for
    /// in-place updates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `key` is not in `from`.
    pub fn move_to(
        &mut self,
        key: &BookKey,
        from: Bucket,
        to: Bucket,
    ) -> Result<&mut BookRecord, StoreError> {
        let record = self
            .bucket_mut(from)
            .remove(key)
            .ok_or_else(|| StoreError::not_found(key.title(), key.author()))?;
        let target = self.bucket_mut(to);
        target.insert(key.clone(), record);
        target
            .get_mut(key)
            .ok_or_else(|| StoreError::not_found(key.title(), key.author()))
    }

    pub(crate) fn from_raw(raw: RawDocument) -> Result<Self, StoreError> {
        let mut document = Self::new(raw.date_since_download);
        let sources = [
            (Bucket::Pending, raw.undownloaded_books),
            (Bucket::Completed, raw.downloaded_books),
            (Bucket::Failed, raw.failed_books),
        ];
        for (bucket, records) in sources {
            for record in records.into_values() {
                let key = record.key();
                if let Some((existing, _)) = document.find(&key) {
                    return Err(StoreError::format(format!(
                        "{key} is listed as both {existing} and {bucket}"
                    )));
                }
                document.bucket_mut(bucket).insert(key, record);
            }
        }
        Ok(document)
    }

    pub(crate) fn to_raw(&self) -> Result<RawDocument, StoreError> {
        let mut seen = HashSet::new();
        let mut encode = |records: &BTreeMap<BookKey, BookRecord>| {
            let mut out = BTreeMap::new();
            for (key, record) in records {
                let storage_key = key.storage_key();
                if !seen.insert(storage_key.clone()) {
                    return Err(StoreError::key_collision(key));
                }
                out.insert(storage_key, record.clone());
            }
            Ok(out)
        };
        Ok(RawDocument {
            undownloaded_books: encode(&self.pending)?,
            downloaded_books: encode(&self.completed)?,
            failed_books: encode(&self.failed)?,
            date_since_download: self.cutoff_date,
        })
    }
}

/// On-disk shape of the database document.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RawDocument {
    pub(crate) undownloaded_books: BTreeMap<String, BookRecord>,
    pub(crate) downloaded_books: BTreeMap<String, BookRecord>,
    #[serde(default)]
    pub(crate) failed_books: BTreeMap<String, BookRecord>,
    #[serde(with = "dates::date")]
    pub(crate) date_since_download: NaiveDate,
}

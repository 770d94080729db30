//! Per-book and per-batch results.

use std::fmt;

use chrono::NaiveDateTime;

use crate::store::BookKey;

/// How one book left the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// File saved; the book moved to the completed bucket.
    Downloaded,
    /// Added before the cutoff date; moved to completed without a download.
    SkippedBeforeCutoff,
    /// No mirror produced a file; the book moved to the failed bucket.
    Failed,
}

impl OutcomeStatus {
    /// Returns the stable label used in logs and CLI output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::SkippedBeforeCutoff => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of processing one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Which book.
    pub key: BookKey,
    /// Mirror the file came through, when downloaded.
    pub resolved_link: Option<String>,
    /// When the file was saved, when downloaded.
    pub timestamp: Option<NaiveDateTime>,
    /// Classification.
    pub status: OutcomeStatus,
    /// Why the book failed, when it failed.
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub(crate) fn downloaded(key: BookKey, link: String, timestamp: NaiveDateTime) -> Self {
        Self {
            key,
            resolved_link: Some(link),
            timestamp: Some(timestamp),
            status: OutcomeStatus::Downloaded,
            error: None,
        }
    }

    pub(crate) fn skipped(key: BookKey) -> Self {
        Self {
            key,
            resolved_link: None,
            timestamp: None,
            status: OutcomeStatus::SkippedBeforeCutoff,
            error: None,
        }
    }

    pub(crate) fn failed(key: BookKey, error: impl Into<String>) -> Self {
        Self {
            key,
            resolved_link: None,
            timestamp: None,
            status: OutcomeStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// Summary of one `process_downloads` run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per input book, in processing order.
    pub outcomes: Vec<DownloadOutcome>,
}

impl BatchReport {
    fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Books saved in this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.count(OutcomeStatus::Downloaded)
    }

    /// Books skipped by the cutoff rule.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(OutcomeStatus::SkippedBeforeCutoff)
    }

    /// Books that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(OutcomeStatus::Failed)
    }

    /// Books processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Summary of one `import_and_merge` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Books found on the shelf.
    pub imported: usize,
    /// Books that were new and went into the pending bucket.
    pub added: usize,
    /// New books left out because their database key was already taken.
    pub skipped: usize,
}

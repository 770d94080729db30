//! Book records and their identity keys.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dates;

/// A single tracked book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Normalized title.
    pub title: String,
    /// Normalized author as shown on the shelf (often `"Last, First"`).
    pub author: String,
    /// Day the book was added to the shelf.
    #[serde(
        default,
        with = "dates::optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<NaiveDate>,
    /// When the book file was saved.
    #[serde(
        default,
        with = "dates::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_downloaded: Option<NaiveDateTime>,
    /// Mirror URL the file was fetched through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
}

impl BookRecord {
    /// Creates a record that has not been downloaded yet.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        date_added: Option<NaiveDate>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date_added,
            date_downloaded: None,
            download_link: None,
        }
    }

    /// Returns this record's identity key.
    #[must_use]
    pub fn key(&self) -> BookKey {
        BookKey::new(&self.title, &self.author)
    }
}

/// Identity of a book: the exact `(title, author)` pair.
///
/// The database document stores the key as the bare concatenation
/// `title ++ author` (see [`storage_key`](Self::storage_key)); in memory both
/// parts are kept so that pairs such as `("AB", "C")` and `("A", "BC")` stay
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookKey {
    title: String,
    author: String,
}

impl BookKey {
    /// Creates a key from a title and author, compared case-sensitively.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// The title part.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author part.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The key string written to the database document.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.title, self.author)
    }

    /// The same title with the author name order flipped, if the author has a
    /// recognizable `"Last, First"` or `"First Last"` shape.
    #[must_use]
    pub fn with_swapped_author(&self) -> Option<Self> {
        swap_author_order(&self.author).map(|author| Self::new(self.title.clone(), author))
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {}", self.title, self.author)
    }
}

/// Flips between `"Last, First"` and `"First Last"`.
///
/// `"Herbert, Frank"` becomes `"Frank Herbert"`; `"Ursula K. Le Guin"` becomes
/// `"Guin, Ursula K. Le"` (the last word is taken as the surname). Single-word
/// names have no alternate form.
#[must_use]
pub fn swap_author_order(author: &str) -> Option<String> {
    let author = author.trim();
    if let Some((last, first)) = author.split_once(',') {
        let (last, first) = (last.trim(), first.trim());
        if last.is_empty() || first.is_empty() || first.contains(',') {
            return None;
        }
        return Some(format!("{first} {last}"));
    }

    let words: Vec<&str> = author.split_whitespace().collect();
    let (surname, given) = words.split_last()?;
    if given.is_empty() {
        return None;
    }
    Some(format!("{surname}, {}", given.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_plain_concatenation() {
        let key = BookKey::new("Dune", "Frank Herbert");
        assert_eq!(key.storage_key(), "DuneFrank Herbert");
    }

    #[test]
    fn test_composite_keys_do_not_collide() {
        let left = BookKey::new("AB", "C");
        let right = BookKey::new("A", "BC");
        assert_ne!(left, right);
        assert_eq!(left.storage_key(), right.storage_key());
    }

    #[test]
    fn test_key_is_case_sensitive() {
        assert_ne!(BookKey::new("dune", "Frank Herbert"), BookKey::new("Dune", "Frank Herbert"));
    }

    #[test]
    fn test_swap_author_last_first() {
        assert_eq!(swap_author_order("Herbert, Frank").as_deref(), Some("Frank Herbert"));
    }

    #[test]
    fn test_swap_author_first_last() {
        assert_eq!(swap_author_order("Frank Herbert").as_deref(), Some("Herbert, Frank"));
        assert_eq!(
            swap_author_order("  J.R.R.   Tolkien ").as_deref(),
            Some("Tolkien, J.R.R.")
        );
    }

    #[test]
    fn test_swap_author_round_trips() {
        let swapped = swap_author_order("Frank Herbert").unwrap_or_default();
        assert_eq!(swap_author_order(&swapped).as_deref(), Some("Frank Herbert"));
    }

    #[test]
    fn test_swap_author_single_word_has_no_alternate() {
        assert_eq!(swap_author_order("Homer"), None);
        assert_eq!(swap_author_order(", Frank"), None);
        assert_eq!(swap_author_order("A, B, C"), None);
    }

    #[test]
    fn test_record_key_uses_title_and_author() {
        let record = BookRecord::new("Dune", "Frank Herbert", None);
        assert_eq!(record.key(), BookKey::new("Dune", "Frank Herbert"));
    }

    #[test]
    fn test_record_json_omits_missing_fields() {
        let record = BookRecord::new("Dune", "Frank Herbert", NaiveDate::from_ymd_opt(2024, 3, 1));
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(json["date_added"], "03-01-2024");
        assert!(json.get("download_link").is_none());
        assert!(json.get("date_downloaded").is_none());
    }
}

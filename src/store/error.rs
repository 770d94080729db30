//! Error types for database operations.

use std::path::PathBuf;

use thiserror::Error;

use super::record::BookKey;

/// Errors that can occur while reading, writing or editing the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be read or written.
    #[error("storage error at {path}: {source}")]
    Storage {
        /// Database file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The database content is not a valid document.
    #[error(
        "malformed database: {message}\n  Suggestion: fix the file by hand or run `bookfetch init` to start over"
    )]
    Format {
        /// What was wrong.
        message: String,
    },

    /// Two different books would be saved under the same database key.
    #[error(
        "\"{title}\" by {author} shares database key '{storage_key}' with another book\n  Suggestion: adjust the title or author spelling of one of them"
    )]
    KeyCollision {
        /// Title of the rejected book.
        title: String,
        /// Author of the rejected book.
        author: String,
        /// The shared on-disk key.
        storage_key: String,
    },

    /// The requested book is not in any bucket.
    #[error(
        "book not found: \"{title}\" by {author}\n  Suggestion: run `bookfetch list` to see stored titles"
    )]
    NotFound {
        /// Title that was looked up.
        title: String,
        /// Author that was looked up.
        author: String,
    },
}

impl StoreError {
    /// Creates a storage error.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Creates a key-collision error for `key`.
    pub fn key_collision(key: &BookKey) -> Self {
        Self::KeyCollision {
            title: key.title().to_string(),
            author: key.author().to_string(),
            storage_key: key.storage_key(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::NotFound {
            title: title.into(),
            author: author.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_storage_message() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::storage("/data/database.json", io_error);
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("/data/database.json"));
    }

    #[test]
    fn test_store_error_not_found_message() {
        let err = StoreError::not_found("Dune", "Frank Herbert");
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("Dune"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_store_error_key_collision_message() {
        let err = StoreError::key_collision(&BookKey::new("A", "BC"));
        let msg = err.to_string();
        assert!(msg.contains("'ABC'"));
        assert!(!msg.contains("init"));
    }

    #[test]
    fn test_store_error_format_message() {
        let err = StoreError::format("expected value at line 1 column 1");
        assert!(err.to_string().contains("malformed database"));
    }
}

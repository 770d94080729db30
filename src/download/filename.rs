//! Output file naming for saved books.

use std::path::{Path, PathBuf};

use super::constants::BOOK_FILE_EXTENSION;

/// Returns the path a book with `title` is saved to inside `downloads_dir`.
///
/// Spaces become underscores and characters that are unsafe in file names are
/// replaced, so `"Dune Messiah"` saves as `Dune_Messiah.epub`.
#[must_use]
pub fn download_path_for(downloads_dir: &Path, title: &str) -> PathBuf {
    downloads_dir.join(format!(
        "{}.{BOOK_FILE_EXTENSION}",
        sanitize_title(title)
    ))
}

/// Maps a book title to a file stem.
pub(crate) fn sanitize_title(title: &str) -> String {
    let sanitized: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // "." and ".." would escape the downloads directory.
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_path_replaces_spaces() {
        let path = download_path_for(Path::new("/books"), "The Left Hand of Darkness");
        assert_eq!(
            path,
            PathBuf::from("/books/The_Left_Hand_of_Darkness.epub")
        );
    }

    #[test]
    fn test_download_path_strips_path_separators() {
        let path = download_path_for(Path::new("/books"), "Either/Or");
        assert_eq!(path, PathBuf::from("/books/Either_Or.epub"));
        assert_eq!(path.parent(), Some(Path::new("/books")));
    }

    #[test]
    fn test_sanitize_title_rejects_dot_segments() {
        assert_eq!(sanitize_title(".."), "_");
        assert_eq!(sanitize_title("   "), "_");
    }

    #[test]
    fn test_sanitize_title_keeps_unicode() {
        assert_eq!(sanitize_title("Solaris Łem"), "Solaris_Łem");
    }
}

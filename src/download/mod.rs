//! HTTP capability and mirror download execution.
//!
//! This module provides the shared [`HttpClient`] used by every networked
//! component, and the [`MirrorDownloader`] that turns an ordered list of
//! mirror links into a saved book file.
//!
//! # Example
//!
//! ```no_run
//! use bookfetch_core::download::{HttpClient, MirrorDownloader};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = MirrorDownloader::new(HttpClient::new()?);
//! let mirrors = vec!["https://mirror.example/ads.php?md5=abc".to_string()];
//! if let Some(used) = downloader.resolve_and_save(&mirrors, Path::new("Dune.epub")).await {
//!     println!("saved via {used}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod executor;
mod filename;

pub use client::HttpClient;
pub use constants::{BOOK_FILE_EXTENSION, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::{DownloadError, FetchError};
pub use executor::{MirrorDownloader, find_download_link};
pub use filename::download_path_for;

//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use bookfetch_core::store::dates;
use bookfetch_core::{Bucket, DEFAULT_CUTOFF_DATE};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Sync a reading shelf to local ebook downloads.
///
/// Bookfetch imports the books on a public reading shelf, finds them on a
/// book mirror catalog and downloads the files, remembering which books are
/// pending, downloaded or failed.
#[derive(Parser, Debug)]
#[command(name = "bookfetch")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file path (defaults to $XDG_CONFIG_HOME/bookfetch/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the config file, create the database and the downloads directory
    Init(InitArgs),

    /// Import new books from the shelf into the pending list
    Update,

    /// Download every pending book
    Download(DownloadArgs),

    /// List tracked books
    List(ListArgs),

    /// Add a book by hand
    Add(AddArgs),

    /// Stop tracking a book
    Remove(RemoveArgs),

    /// Show or change the shelf URL
    Url(UrlArgs),
}

/// Arguments for `bookfetch init`.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Public shelf URL, quoted
    pub shelf_url: String,

    /// Books added more than a day before this date count as already owned
    #[arg(short, long, value_name = "MM-DD-YYYY", default_value = DEFAULT_CUTOFF_DATE, value_parser = parse_cli_date)]
    pub date: NaiveDate,

    /// Database file path
    #[arg(long, alias = "db_path", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Downloads directory
    #[arg(long, alias = "downloads_path", value_name = "PATH")]
    pub downloads_path: Option<PathBuf>,
}

/// Arguments for `bookfetch download`.
#[derive(Args, Debug, Clone, Copy)]
pub struct DownloadArgs {
    /// Retry failed downloads instead of pending ones
    #[arg(short, long)]
    pub retry: bool,
}

/// Arguments for `bookfetch list`. At most one filter may be given.
#[derive(Args, Debug, Clone, Copy)]
#[group(id = "bucket", multiple = false)]
pub struct ListArgs {
    /// Only downloaded books
    #[arg(long)]
    pub downloaded: bool,

    /// Only books waiting to be downloaded
    #[arg(long)]
    pub undownloaded: bool,

    /// Only books whose download failed
    #[arg(long)]
    pub failed: bool,
}

impl ListArgs {
    /// The requested bucket, or `None` for every bucket.
    #[must_use]
    pub fn bucket(self) -> Option<Bucket> {
        if self.downloaded {
            Some(Bucket::Completed)
        } else if self.undownloaded {
            Some(Bucket::Pending)
        } else if self.failed {
            Some(Bucket::Failed)
        } else {
            None
        }
    }
}

/// Arguments for `bookfetch add`.
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Book title
    pub title: String,

    /// Book author
    pub author: String,

    /// Day the book was added to the list
    #[arg(short, long, value_name = "MM-DD-YYYY", value_parser = parse_cli_date)]
    pub date: Option<NaiveDate>,

    /// Bucket to put the book in (pending, downloaded or failed)
    #[arg(long, default_value = "pending", value_parser = parse_cli_bucket)]
    pub destination: Bucket,
}

/// Arguments for `bookfetch remove`.
#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Book title
    pub title: String,

    /// Book author, in either "First Last" or "Last, First" order
    pub author: String,
}

/// Arguments for `bookfetch url`.
#[derive(Args, Debug, Clone)]
pub struct UrlArgs {
    /// Replace the stored shelf URL
    #[arg(long, value_name = "URL")]
    pub set: Option<String>,
}

fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    dates::parse_date(value).map_err(|e| format!("expected MM-DD-YYYY: {e}"))
}

fn parse_cli_bucket(value: &str) -> Result<Bucket, String> {
    value.parse()
}

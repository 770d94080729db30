//! `list`, `add` and `remove` commands.

use anyhow::Result;
use bookfetch_core::store::dates::{format_date, format_timestamp};
use bookfetch_core::{BookRecord, Bucket};

use crate::app::context::RunContext;
use crate::cli::{AddArgs, ListArgs, RemoveArgs};

pub fn run_list_command(ctx: &RunContext, args: ListArgs) -> Result<()> {
    let library = ctx.offline_library();
    let books = library.list(args.bucket())?;
    if books.is_empty() {
        println!("No books");
        return Ok(());
    }
    for (bucket, record) in &books {
        println!("{}", format_book_line(*bucket, record));
    }
    Ok(())
}

pub fn run_add_command(ctx: &RunContext, args: &AddArgs) -> Result<()> {
    let library = ctx.offline_library();
    let previous = library.add_book(&args.title, &args.author, args.date, args.destination)?;
    match previous {
        Some(previous) if previous != args.destination => println!(
            "Moved {} by {} from {previous} to {}",
            args.title, args.author, args.destination
        ),
        _ => println!(
            "Added {} by {} to {}",
            args.title, args.author, args.destination
        ),
    }
    Ok(())
}

pub fn run_remove_command(ctx: &RunContext, args: &RemoveArgs) -> Result<()> {
    let library = ctx.offline_library();
    let (bucket, record) = library.remove_book(&args.title, &args.author)?;
    println!("Removed {} by {} from {bucket}", record.title, record.author);
    Ok(())
}

fn format_book_line(bucket: Bucket, record: &BookRecord) -> String {
    let mut line = format!("{:<12} {} by {}", bucket.as_str(), record.title, record.author);
    if let Some(added) = record.date_added {
        line.push_str(&format!(" (added {})", format_date(added)));
    }
    if let Some(downloaded) = record.date_downloaded {
        line.push_str(&format!(" (downloaded {})", format_timestamp(downloaded)));
    }
    line
}

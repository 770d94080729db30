//! Shelf page parsing and field normalization.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::html::{collapse_whitespace, selector};
use crate::store::BookRecord;

/// Shelf date format, e.g. `"Mar 1, 2024"`.
const SHELF_DATE_FORMAT: &str = "%b %d, %Y";

/// Parses every listing row on a shelf page.
///
/// Rows missing the title, author or date-added field, or with an unreadable
/// date, are skipped with a warning.
#[must_use]
pub fn parse_shelf_page(html: &str) -> Vec<BookRecord> {
    let document = Html::parse_document(html);
    let rows = selector("tr.bookalike.review");

    let mut records = Vec::new();
    for (index, row) in document.select(&rows).enumerate() {
        match parse_row(row) {
            Some(record) => records.push(record),
            None => warn!(row = index, "skipping shelf row with missing or malformed fields"),
        }
    }
    debug!(rows = records.len(), "shelf page parsed");
    records
}

fn parse_row(row: ElementRef<'_>) -> Option<BookRecord> {
    let title = field_value(row, "td.field.title", "title").map(|raw| normalize_title(&raw))?;
    let author = field_value(row, "td.field.author", "author").map(|raw| normalize_author(&raw))?;
    if title.is_empty() || author.is_empty() {
        return None;
    }
    let date_added = field_value(row, "td.field.date_added", "date added")
        .and_then(|raw| parse_shelf_date(&raw))?;
    Some(BookRecord::new(title, author, Some(date_added)))
}

/// Returns a cell's text with its leading field label removed.
///
/// The shelf markup renders the label inside the same cell as the value, so
/// the raw text reads like `"title\n   Dune (Dune Chronicles, #1)"`.
fn field_value(row: ElementRef<'_>, css: &'static str, label: &str) -> Option<String> {
    let cell = row.select(&selector(css)).next()?;
    let text: String = cell.text().collect();
    let text = text.trim_start();
    let value = text.strip_prefix(label).unwrap_or(text);
    let value = collapse_whitespace(value);
    (!value.is_empty()).then_some(value)
}

/// Removes bracketed annotations such as series or edition notes.
///
/// `"Dune (Dune Chronicles, #1)"` becomes `"Dune"`. Only matched `()`/`[]`
/// pairs are removed; an unbalanced bracket is left in place.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut removed = vec![false; chars.len()];
    let mut open: Vec<(char, usize)> = Vec::new();

    for (index, &ch) in chars.iter().enumerate() {
        match ch {
            '(' | '[' => open.push((ch, index)),
            ')' | ']' => {
                let expected = if ch == ')' { '(' } else { '[' };
                if let Some(pos) = open.iter().rposition(|&(opener, _)| opener == expected) {
                    let (_, start) = open[pos];
                    open.truncate(pos);
                    removed[start..=index].iter_mut().for_each(|flag| *flag = true);
                }
            }
            _ => {}
        }
    }

    let kept: String = chars
        .iter()
        .zip(removed)
        .filter_map(|(&ch, gone)| (!gone).then_some(ch))
        .collect();
    collapse_whitespace(&kept)
}

/// Strips `*` footnote markers (used for co-author notes) from an author name.
#[must_use]
pub fn normalize_author(raw: &str) -> String {
    collapse_whitespace(&raw.replace('*', ""))
}

/// Parses a shelf date such as `"Mar 1, 2024"` or `"Mar 01, 2024"`.
#[must_use]
pub fn parse_shelf_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&collapse_whitespace(raw), SHELF_DATE_FORMAT).ok()
}

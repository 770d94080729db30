//! Catalog result-table parsing.

use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use url::Url;

use super::Category;
use crate::html::{absolutize_url, element_text, own_text, selector};

/// Zero-based cell holding the title in both result layouts.
const TITLE_CELL: usize = 2;

/// Zero-based cell holding the first mirror link in the nonfiction layout.
const NONFICTION_MIRROR_CELL: usize = 9;

/// Returns true when either title contains the other.
///
/// Tolerates subtitle and edition differences: `"Dune"` matches
/// `"Dune (Dune Chronicles #1)"` in both directions. Comparison is
/// case-sensitive; an empty title never matches.
#[must_use]
pub fn titles_match(query_title: &str, row_title: &str) -> bool {
    let (query, row) = (query_title.trim(), row_title.trim());
    if query.is_empty() || row.is_empty() {
        return false;
    }
    row.contains(query) || query.contains(row)
}

/// Extracts first-mirror links for every row whose title matches
/// `query_title`, in row order.
///
/// Returns `None` when the results table is missing or has no data rows;
/// `Some` (possibly empty) once rows were found.
#[must_use]
pub fn parse_results(
    html: &str,
    category: Category,
    query_title: &str,
    base_url: &Url,
) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let table = document.select(&selector(category.table_selector())).next()?;

    // First row is the column header in both layouts.
    let rows: Vec<ElementRef<'_>> = table.select(&selector("tr")).skip(1).collect();
    if rows.is_empty() {
        return None;
    }

    let mut links = Vec::new();
    for row in rows {
        let Some(row_title) = row_title(row, category) else {
            trace!("row without a title cell");
            continue;
        };
        if !titles_match(query_title, &row_title) {
            trace!(row_title = %row_title, "title mismatch");
            continue;
        }
        match first_mirror(row, category).and_then(|href| absolutize_url(&href, base_url)) {
            Some(link) => {
                debug!(row_title = %row_title, mirror = %link, "matched catalog row");
                links.push(link);
            }
            None => debug!(row_title = %row_title, "matched row has no mirror link"),
        }
    }
    Some(links)
}

fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.select(&selector("td")).collect()
}

fn row_title(row: ElementRef<'_>, category: Category) -> Option<String> {
    let cells = row_cells(row);
    let cell = cells.get(TITLE_CELL)?;
    let title = match category {
        Category::Fiction => cell.select(&selector("a")).next().map(element_text),
        // The title anchor is the one with an id; series and ISBN markup is nested inside it.
        Category::Nonfiction => cell.select(&selector("a[id]")).next().map(own_text),
    }?;
    (!title.is_empty()).then_some(title)
}

fn first_mirror(row: ElementRef<'_>, category: Category) -> Option<String> {
    let anchor = match category {
        Category::Fiction => row
            .select(&selector("ul.record_mirrors_compact li a[href]"))
            .next(),
        Category::Nonfiction => row_cells(row)
            .get(NONFICTION_MIRROR_CELL)?
            .select(&selector("a[href]"))
            .next(),
    }?;
    anchor.value().attr("href").map(str::to_string)
}

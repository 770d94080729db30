//! Shared HTML helpers: selector construction, text extraction and link
//! absolutization.
//!
//! Parsing is kept synchronous and returns owned values. `scraper::Html` is not
//! `Send`, so a parsed document must never live across an `.await`.

use scraper::{ElementRef, Selector};
use url::Url;

/// Parses a CSS selector known at compile time; panics on an invalid pattern.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector '{css}': {e:?}"))
}

/// Returns all text below `element` with runs of whitespace collapsed to one space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Returns only the text nodes that are direct children of `element`.
///
/// Catalog title anchors embed series and ISBN markup inside the same anchor;
/// the title itself is the anchor's own text.
pub(crate) fn own_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();
    collapse_whitespace(&raw)
}

/// Collapses runs of whitespace (including newlines) to single spaces and trims.
pub(crate) fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a possibly relative URL string against a base URL.
///
/// Returns the value as-is if it already starts with `http://` or `https://`;
/// normalizes `//...` to `https:...`; otherwise joins with `base_url`.
#[must_use]
pub(crate) fn absolutize_url(value: &str, base_url: &Url) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }
    base_url.join(value).ok().map(|url| url.to_string())
}

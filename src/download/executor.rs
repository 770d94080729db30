//! Mirror walking: landing page -> download anchor -> file on disk.

use std::path::Path;

use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::HttpClient;
use super::error::DownloadError;
use crate::html::{absolutize_url, selector};

/// Tries candidate mirrors in order and saves the first file that downloads.
#[derive(Debug, Clone)]
pub struct MirrorDownloader {
    client: HttpClient,
}

impl MirrorDownloader {
    /// Creates a downloader that uses `client` for every request.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Walks `candidates` in order and writes the first successful file to
    /// `destination`.
    ///
    /// Returns the candidate (landing page) URL that produced the file, or
    /// `None` once every candidate has failed. Failures are logged per
    /// candidate and never abort the walk.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len(), dest = %destination.display()))]
    pub async fn resolve_and_save(&self, candidates: &[String], destination: &Path) -> Option<String> {
        for (index, candidate) in candidates.iter().enumerate() {
            match self.try_candidate(candidate, destination).await {
                Ok(bytes) => {
                    info!(mirror = %candidate, bytes, attempt = index + 1, "book saved");
                    return Some(candidate.clone());
                }
                Err(error) => {
                    warn!(mirror = %candidate, attempt = index + 1, error = %error, "mirror failed, trying next");
                }
            }
        }
        debug!("all mirrors exhausted");
        None
    }

    async fn try_candidate(&self, candidate: &str, destination: &Path) -> Result<usize, DownloadError> {
        let landing = self.client.get_text(candidate).await?;
        let download_url = find_download_link(&landing, candidate).ok_or_else(|| {
            DownloadError::MissingDownloadLink {
                url: candidate.to_string(),
            }
        })?;
        debug!(landing = %candidate, target = %download_url, "following download link");

        let body = self.client.get_bytes(&download_url).await?;
        tokio::fs::write(destination, &body)
            .await
            .map_err(|e| DownloadError::io(destination, e))?;
        Ok(body.len())
    }
}

/// Finds the designated download anchor (`div#download a[href]`) on a mirror
/// landing page, resolved against the page URL.
#[must_use]
pub fn find_download_link(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let href = document
        .select(&selector("div#download a[href]"))
        .next()
        .and_then(|anchor| anchor.value().attr("href"))?
        .to_string();

    match Url::parse(page_url) {
        Ok(base) => absolutize_url(&href, &base),
        Err(_) => Some(href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_download_link_absolute() {
        let html = r#"<html><body>
            <div id="info"><a href="https://elsewhere.example/x">other</a></div>
            <div id="download"><h2><a href="https://cdn.example/get/dune.epub">GET</a></h2></div>
        </body></html>"#;
        assert_eq!(
            find_download_link(html, "https://mirror.example/ads.php?md5=abc").as_deref(),
            Some("https://cdn.example/get/dune.epub")
        );
    }

    #[test]
    fn test_find_download_link_relative_to_page() {
        let html = r#"<div id="download"><a href="get.php?md5=abc&key=k1">GET</a></div>"#;
        assert_eq!(
            find_download_link(html, "https://mirror.example/main/ads.php?md5=abc").as_deref(),
            Some("https://mirror.example/main/get.php?md5=abc&key=k1")
        );
    }

    #[test]
    fn test_find_download_link_missing_block() {
        let html = r#"<div id="info"><a href="https://cdn.example/x">GET</a></div>"#;
        assert_eq!(find_download_link(html, "https://mirror.example/"), None);
    }
}

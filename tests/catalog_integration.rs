//! Integration tests for catalog search against a mock catalog.

mod support;

use bookfetch_core::catalog::{CatalogError, CatalogResolver, Category, MatchCriteria};
use bookfetch_core::download::HttpClient;
use support::{
    fiction_no_results_page, fiction_page, fiction_row, mount_fiction, nonfiction_page,
    nonfiction_row,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(server: &MockServer) -> CatalogResolver {
    CatalogResolver::new(HttpClient::new().unwrap(), &server.uri()).unwrap()
}

#[tokio::test]
async fn test_fiction_search_returns_first_mirror_of_matching_rows() {
    let server = MockServer::start().await;
    let page = fiction_page(&[
        fiction_row(
            "Dune",
            &["/ads.php?md5=1".to_string(), "http://second.invalid/1".to_string()],
        ),
        fiction_row("Emma", &["/ads.php?md5=2".to_string()]),
        fiction_row("Dune Messiah", &["http://mirror.invalid/3".to_string()]),
    ]);
    mount_fiction(&server, "authors", page).await;

    let links = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Author, Category::Fiction)
        .await
        .unwrap();
    assert_eq!(
        links,
        vec![
            format!("{}/ads.php?md5=1", server.uri()),
            "http://mirror.invalid/3".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_fiction_search_sends_escaped_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fiction/"))
        .and(query_param("q", "Herbert, Frank"))
        .and(query_param("criteria", "authors"))
        .and(query_param("language", "English"))
        .and(query_param("format", "epub"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fiction_page(&[fiction_row(
            "Dune",
            &["http://mirror.invalid/1".to_string()],
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let links = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Author, Category::Fiction)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn test_table_without_matching_title_is_empty_success() {
    let server = MockServer::start().await;
    mount_fiction(
        &server,
        "title",
        fiction_page(&[fiction_row("Emma", &["http://mirror.invalid/1".to_string()])]),
    )
    .await;

    let links = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Title, Category::Fiction)
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_missing_results_table_is_no_results() {
    let server = MockServer::start().await;
    mount_fiction(&server, "", fiction_no_results_page()).await;

    let err = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Both, Category::Fiction)
        .await
        .unwrap_err();
    match err {
        CatalogError::NoResults { query } => assert_eq!(query, "Dune Herbert, Frank"),
        other => panic!("expected NoResults, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Title, Category::Nonfiction)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Unreachable(_)), "got {err:?}");
}

#[tokio::test]
async fn test_nonfiction_search_reads_mirror_column() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .and(query_param("req", "Dune"))
        .and(query_param("column", "title"))
        .respond_with(ResponseTemplate::new(200).set_body_string(nonfiction_page(&[
            nonfiction_row("Dune", "http://library.invalid/main/A"),
            nonfiction_row("Neuromancer", "http://library.invalid/main/B"),
        ])))
        .mount(&server)
        .await;

    let links = resolver(&server)
        .search("Dune", "Herbert, Frank", MatchCriteria::Title, Category::Nonfiction)
        .await
        .unwrap();
    assert_eq!(links, vec!["http://library.invalid/main/A".to_string()]);
}

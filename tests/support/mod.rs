//! Shared HTML fixtures and mock-server helpers for integration tests.
//!
//! Pages mirror the markup of the shelf site, the catalog and the mirror
//! landing pages closely enough for the parsers to treat them as real.

#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One shelf listing row.
pub fn shelf_row(title: &str, author: &str, date_added: &str) -> String {
    format!(
        r#"<tr id="review_1" class="bookalike review">
            <td class="field cover"><label>cover</label><div class="value"><img src="c.jpg"></div></td>
            <td class="field title"><label>title</label><div class="value"><a title="{title}" href="/book/show/1">{title}</a></div></td>
            <td class="field author"><label>author</label><div class="value"><a href="/author/show/2">{author}</a>*</div></td>
            <td class="field date_added"><label>date added</label><div class="value"><span title="{date_added}">{date_added}</span></div></td>
        </tr>"#
    )
}

/// A full shelf page around `rows`.
pub fn shelf_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table id="books"><tbody id="booksBody">{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

/// One fiction result row whose mirror list holds `mirrors`.
pub fn fiction_row(title: &str, mirrors: &[String]) -> String {
    let items: String = mirrors
        .iter()
        .map(|m| format!(r#"<li><a href="{m}" title="mirror">[1]</a></li>"#))
        .collect();
    format!(
        r#"<tr><td><ul class="catalog_authors"><li><a href="/fiction/?q=x">Author</a></li></ul></td>
        <td></td><td><p><a href="/fiction/ABC">{title}</a></p><p class="catalog_identifier">ISBN: 1</p></td>
        <td>English</td><td>EPUB / 1 Mb</td>
        <td><ul class="record_mirrors_compact">{items}</ul></td><td></td></tr>"#
    )
}

/// A fiction results page around `rows`.
pub fn fiction_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="catalog"><thead><tr><th>Author(s)</th><th>Series</th><th>Title</th><th>Language</th><th>File</th><th>Mirrors</th><th></th></tr></thead>
        <tbody>{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

/// The catalog's "nothing found" fiction page.
pub fn fiction_no_results_page() -> String {
    "<html><body><p>No files were found.</p></body></html>".to_string()
}

/// One nonfiction result row with `mirror` in the first mirror column.
pub fn nonfiction_row(title: &str, mirror: &str) -> String {
    format!(
        r#"<tr valign="top"><td>1</td><td><a href="search.php?req=a">Author</a></td>
        <td width="500"><a href="book/index.php?md5=A" title="" id="1">{title}<br><font face="Times" color="green"><i>ISBN 9</i></font></a></td>
        <td>Pub</td><td>2001</td><td>300</td><td>English</td><td>2 Mb</td><td>epub</td>
        <td><a href="{mirror}" title="this mirror">[1]</a></td><td><a href="http://other.invalid/">[2]</a></td><td></td></tr>"#
    )
}

/// A nonfiction results page around `rows`.
pub fn nonfiction_page(rows: &[String]) -> String {
    format!(
        r##"<html><body><table width="100%" cellspacing="1" cellpadding="1" rules="rows" class="c" align="center">
        <tr valign="top" bgcolor="#C0C0C0"><td><b>ID</b></td><td><b>Author(s)</b></td><td><b>Title</b></td><td><b>Publisher</b></td><td><b>Year</b></td><td><b>Pages</b></td><td><b>Language</b></td><td><b>Size</b></td><td><b>Extension</b></td><td colspan="2"><b>Mirrors</b></td><td><b>Edit</b></td></tr>
        {}</table></body></html>"##,
        rows.concat()
    )
}

/// A mirror landing page whose download anchor points at `href`.
pub fn landing_page(href: &str) -> String {
    format!(
        r#"<html><body><table><tr><td><div id="download"><h2><a href="{href}">GET</a></h2></div></td></tr></table></body></html>"#
    )
}

/// Mounts a landing page at `landing_path` linking to a file at `file_path`
/// with `body`.
pub async fn mount_mirror(server: &MockServer, landing_path: &str, file_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(landing_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page(file_path)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Mounts a fiction results page answering queries with `criteria`.
pub async fn mount_fiction(server: &MockServer, criteria: &str, page: String) {
    Mock::given(method("GET"))
        .and(path("/fiction/"))
        .and(query_param("criteria", criteria))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

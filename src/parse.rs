//! HTML results-table extraction.
//!
//! The search page carries its results as a plain `<table>` with a fixed
//! column order and no distinguishing classes or ids, so extraction works by
//! cell position: `[0]=id, [1]=author, [2]=title+link, [3]=publisher,
//! [4]=year, [5]=pages, [6]=language, [7]=size, [8]=extension`.
//!
//! A row is a *candidate* when its first cell parses as a non-negative
//! integer; everything else (decoration, navigation, pagination rows) is
//! skipped. The first candidate row on every page is the column-header row
//! and is dropped unconditionally. Candidate rows that yield no MD5 or an
//! empty title are dropped silently - structurally broken HTML is filtered,
//! never raised as an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::book::Book;
use crate::config::MirrorConfig;
use crate::links::download_link;

/// Compiles a CSS selector at static init; panics on an invalid pattern.
fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("tr"));
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("td"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));

/// Matches ISBN-like tokens: any run containing 4+ consecutive digits,
/// possibly embedded in a longer alphanumeric run. The title cell mixes the
/// title anchor with ISBN annotations that must not end up in filenames.
static ISBN_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\S*\d{4,}\S*\b").unwrap_or_else(|e| panic!("invalid ISBN regex: {e}"))
});

/// Parses one search-results page into an ordered list of [`Book`]s.
///
/// Row order is preserved; the header row and invalid rows are excluded.
/// Parsing is pure and deterministic: the same HTML always yields the same
/// sequence.
#[must_use]
pub fn parse_search_page(html: &str, config: &MirrorConfig) -> Vec<Book> {
    let document = Html::parse_document(html);

    let mut books = Vec::new();
    // The first candidate row is the column header, consumed exactly once.
    let mut header_pending = true;

    for row in document.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
        if candidate_id(&cells).is_none() {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }
        if let Some(book) = parse_row(&cells, config) {
            books.push(book);
        }
    }

    debug!(count = books.len(), "parsed search results page");
    books
}

/// Returns the row's identifier when its first cell parses as a
/// non-negative integer, i.e. when the row is a candidate data row.
fn candidate_id(cells: &[ElementRef<'_>]) -> Option<String> {
    let text = cell_text(cells.first()?);
    text.parse::<u64>().ok()?;
    Some(text)
}

/// Parses one candidate row into a [`Book`], or `None` when the row fails
/// validation (no MD5 in the title link, or an empty title after cleanup).
fn parse_row(cells: &[ElementRef<'_>], config: &MirrorConfig) -> Option<Book> {
    let id = candidate_id(cells)?;

    let title_cell = cells.get(2)?;
    let md5 = extract_md5(title_cell);
    if md5.is_empty() {
        return None;
    }

    let title = strip_isbn_tokens(&anchor_text(title_cell));
    if title.is_empty() {
        return None;
    }

    let extension = cell_text_at(cells, 8);
    let link = download_link(config, &md5, &id, &title, &extension);

    Some(Book {
        id,
        md5,
        title,
        author: cell_text_at(cells, 1),
        publisher: cell_text_at(cells, 3),
        year: cell_text_at(cells, 4),
        pages: cell_text_at(cells, 5),
        language: cell_text_at(cells, 6),
        size: cell_text_at(cells, 7),
        extension,
        download_link: link,
        ..Book::default()
    })
}

/// Pulls the MD5 out of the title cell's first anchor by splitting its href
/// on the literal `md5=`. Anything other than exactly two segments means the
/// link does not carry a hash, which yields an empty string.
fn extract_md5(title_cell: &ElementRef<'_>) -> String {
    let Some(href) = title_cell
        .select(&ANCHOR_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
    else {
        return String::new();
    };

    let parts: Vec<&str> = href.split("md5=").collect();
    if parts.len() == 2 {
        parts[1].to_string()
    } else {
        String::new()
    }
}

/// Concatenated text of every anchor inside the cell. The title cell nests
/// the title itself and any edition/ISBN annotations in separate anchors.
fn anchor_text(cell: &ElementRef<'_>) -> String {
    cell.select(&ANCHOR_SELECTOR)
        .flat_map(|a| a.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Removes ISBN-like tokens, stray commas, and surrounding whitespace.
fn strip_isbn_tokens(title: &str) -> String {
    let cleaned = ISBN_TOKEN_RE.replace_all(title, "");
    cleaned.replace(',', "").trim().to_string()
}

fn cell_text_at(cells: &[ElementRef<'_>], index: usize) -> String {
    cells.get(index).map(cell_text).unwrap_or_default()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wraps rows in the minimal table skeleton the parser expects.
    fn page(rows: &str) -> String {
        format!("<html><body><table>{rows}</table></body></html>")
    }

    /// A well-formed data row in mirror column order.
    fn data_row(id: &str, title: &str, md5: &str) -> String {
        format!(
            "<tr><td>{id}</td><td>Some Author</td>\
             <td><a href=\"book/index.php?md5={md5}\">{title}</a></td>\
             <td>Pub</td><td>1867</td><td>500</td><td>English</td>\
             <td>2 Mb</td><td>pdf</td></tr>"
        )
    }

    /// Header rows on the live mirror are candidate rows too (the first cell
    /// renders the numeric sort state), which is why the parser drops the
    /// first candidate unconditionally.
    fn header_row() -> String {
        data_row("0", "Title", "")
            .replace("href=\"book/index.php?md5=\"", "href=\"search.php?sort=title\"")
    }

    #[test]
    fn test_first_candidate_row_is_always_dropped() {
        let html = page(&format!(
            "{}{}",
            data_row("1111", "First Book", "AAAA1111BBBB2222CCCC3333DDDD4444"),
            data_row("2222", "Second Book", "EEEE5555FFFF6666AAAA7777BBBB8888"),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert_eq!(books.len(), 1, "header-position row must be excluded");
        assert_eq!(books[0].id, "2222");
    }

    #[test]
    fn test_non_candidate_rows_are_ignored_without_consuming_header_skip() {
        let html = page(&format!(
            "<tr><td>ID</td><td>Author</td><td>Title</td></tr>{}{}",
            header_row(),
            data_row("4321", "Real Book", "0123456789abcdef0123456789abcdef"),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Real Book");
    }

    #[test]
    fn test_row_without_md5_in_href_is_dropped() {
        let malformed =
            "<tr><td>5555</td><td>A</td><td><a href=\"book/index.php?id=5555\">No Hash</a></td>\
             <td></td><td></td><td></td><td></td><td></td><td>pdf</td></tr>";
        let html = page(&format!(
            "{}{}{}",
            header_row(),
            malformed,
            data_row("6666", "Good Book", "0123456789abcdef0123456789abcdef"),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "6666");
    }

    #[test]
    fn test_row_with_doubled_md5_marker_is_dropped() {
        let doubled =
            "<tr><td>7777</td><td>A</td><td><a href=\"x?md5=aaa&amp;md5=bbb\">Twice</a></td>\
             <td></td><td></td><td></td><td></td><td></td><td>pdf</td></tr>";
        let html = page(&format!("{}{doubled}", header_row()));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert!(books.is_empty(), "ambiguous md5 split must not produce a record");
    }

    #[test]
    fn test_isbn_tokens_and_commas_are_stripped_from_title() {
        let html = page(&format!(
            "{}{}",
            header_row(),
            data_row(
                "8888",
                "Das Kapital, 9780140445688",
                "0123456789abcdef0123456789abcdef"
            ),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert_eq!(books[0].title, "Das Kapital");
    }

    #[test]
    fn test_title_that_is_only_an_isbn_is_dropped() {
        let html = page(&format!(
            "{}{}",
            header_row(),
            data_row("9999", "9780140445688", "0123456789abcdef0123456789abcdef"),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        assert!(books.is_empty(), "a title emptied by cleanup fails validation");
    }

    #[test]
    fn test_descriptive_columns_map_by_position() {
        let html = page(&format!(
            "{}{}",
            header_row(),
            data_row("1234", "Das Kapital", "ABCD1234ABCD1234ABCD1234ABCD1234"),
        ));
        let books = parse_search_page(&html, &MirrorConfig::default());
        let book = &books[0];
        assert_eq!(book.author, "Some Author");
        assert_eq!(book.publisher, "Pub");
        assert_eq!(book.year, "1867");
        assert_eq!(book.pages, "500");
        assert_eq!(book.language, "English");
        assert_eq!(book.size, "2 Mb");
        assert_eq!(book.extension, "pdf");
        assert_eq!(
            book.download_link,
            "https://download.library.lol/main/1000/abcd1234abcd1234abcd1234abcd1234/Das_Kapital.pdf"
        );
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let html = page(&format!(
            "{}{}{}",
            header_row(),
            data_row("1111", "One", "0123456789abcdef0123456789abcdef"),
            data_row("22222", "Two", "fedcba9876543210fedcba9876543210"),
        ));
        let config = MirrorConfig::default();
        let first = parse_search_page(&html, &config);
        let second = parse_search_page(&html, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_page_yields_no_records() {
        assert!(parse_search_page("<html><body></body></html>", &MirrorConfig::default()).is_empty());
        assert!(parse_search_page("", &MirrorConfig::default()).is_empty());
    }
}

//! Download-link derivation and the alternative-mirror resolver.
//!
//! The primary download mirror shards files into directories named after the
//! leading digits of the catalog identifier; the full scheme is undocumented
//! and was reverse-engineered from live mirror paths.

use std::sync::LazyLock;

use reqwest::Client;
use reqwest::header::REFERER;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::config::MirrorConfig;
use crate::error::ClientError;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").unwrap_or_else(|e| panic!("invalid static selector 'a': {e}"))
});

/// Computes the directory shard for a catalog identifier.
///
/// The mirror buckets files by the identifier's leading digits: identifiers
/// of length 4 through 7 map to their first `len - 3` digits padded with
/// three trailing zeros (`"1234"` -> `"1000"`, `"12345"` -> `"12000"`).
/// Anything else - shorter, longer, or non-numeric - yields an empty shard
/// rather than an error; the resulting URL degrades to an empty path segment.
#[must_use]
pub fn shard_for_id(id: &str) -> String {
    if !(4..=7).contains(&id.len()) || !id.bytes().all(|b| b.is_ascii_digit()) {
        return String::new();
    }
    format!("{}000", &id[..id.len() - 3])
}

/// Derives the direct download URL for a record on the primary mirror.
///
/// The MD5 is lowercased and spaces in the title become underscores. No
/// further sanitization is applied: titles may still carry characters that
/// are unsafe in URLs, exactly as the mirror itself serves them.
#[must_use]
pub fn download_link(
    config: &MirrorConfig,
    md5: &str,
    id: &str,
    title: &str,
    extension: &str,
) -> String {
    format!(
        "{}/main/{}/{}/{}.{}",
        config.download_base(),
        shard_for_id(id),
        md5.to_ascii_lowercase(),
        title.replace(' ', "_"),
        extension
    )
}

/// Resolves a download link on the alternative mirror for one MD5.
///
/// Fetches the mirror's redirect page for the uppercased hash and scans its
/// anchors for the first one whose target carries an access key (`&key`).
/// Relative targets are absolutized against the mirror base. `Ok(None)` means
/// the page had no keyed link, which is not an error.
///
/// This costs one full page fetch per record, so it is opt-in and never part
/// of the search path. Callers resolving many records should serialize their
/// requests; the mirror blocks clients that fan out.
///
/// # Errors
///
/// Returns [`ClientError::Http`] or [`ClientError::UnexpectedStatus`] when
/// the redirect page cannot be fetched.
#[tracing::instrument(skip(client, config), fields(md5 = %md5))]
pub(crate) async fn resolve_alternative_link(
    client: &Client,
    config: &MirrorConfig,
    md5: &str,
) -> Result<Option<String>, ClientError> {
    let base = config.alternative_base();
    let url = format!("{base}/ads.php?md5={}", md5.to_ascii_uppercase());

    let mut request = client.get(&url).header(REFERER, base);
    if let Some(host) = Url::parse(base).ok().and_then(|u| u.host_str().map(ToString::to_string)) {
        request = request.header("Alt-Used", host);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ClientError::http(&url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::unexpected_status(&url, status.as_u16()));
    }

    let html = response.text().await.map_err(|e| ClientError::http(&url, e))?;
    let Some(href) = extract_keyed_href(&html) else {
        debug!("redirect page carried no keyed download anchor");
        return Ok(None);
    };

    match absolutize(&href, base) {
        Some(link) => Ok(Some(link)),
        None => {
            warn!(href = %href, "keyed anchor target could not be absolutized");
            Ok(None)
        }
    }
}

/// Returns the first anchor href on the page containing an access key.
fn extract_keyed_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains("&key"))
        .map(ToString::to_string)
}

/// Resolves a possibly relative href against the mirror base URL.
fn absolutize(href: &str, base: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base_url = Url::parse(&format!("{base}/")).ok()?;
    base_url.join(href).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_covers_supported_identifier_lengths() {
        assert_eq!(shard_for_id("1234"), "1000");
        assert_eq!(shard_for_id("12345"), "12000");
        assert_eq!(shard_for_id("123456"), "123000");
        assert_eq!(shard_for_id("1234567"), "1234000");
    }

    #[test]
    fn test_shard_degrades_to_empty_outside_supported_lengths() {
        assert_eq!(shard_for_id(""), "");
        assert_eq!(shard_for_id("123"), "");
        assert_eq!(shard_for_id("12345678"), "");
        assert_eq!(shard_for_id("12a45"), "");
    }

    #[test]
    fn test_download_link_matches_mirror_layout() {
        let config = MirrorConfig::default();
        assert_eq!(
            download_link(&config, "abcd1234", "1234", "Das Kapital", "pdf"),
            "https://download.library.lol/main/1000/abcd1234/Das_Kapital.pdf"
        );
    }

    #[test]
    fn test_download_link_lowercases_md5_and_underscores_title() {
        let config = MirrorConfig::default();
        assert_eq!(
            download_link(&config, "ABCD1234", "12345", "The Communist Manifesto", "epub"),
            "https://download.library.lol/main/12000/abcd1234/The_Communist_Manifesto.epub"
        );
    }

    #[test]
    fn test_unsupported_identifier_yields_empty_shard_segment() {
        let config = MirrorConfig::default();
        assert_eq!(
            download_link(&config, "abcd1234", "123", "Pamphlet", "pdf"),
            "https://download.library.lol/main//abcd1234/Pamphlet.pdf"
        );
    }

    #[test]
    fn test_keyed_href_extraction_takes_first_match() {
        let html = r#"<html><body>
            <a href="/covers/cover.jpg">cover</a>
            <a href="get.php?md5=ABCD&key=FIRST">GET</a>
            <a href="get.php?md5=ABCD&key=SECOND">MIRROR</a>
        </body></html>"#;
        assert_eq!(
            extract_keyed_href(html),
            Some("get.php?md5=ABCD&key=FIRST".to_string())
        );
    }

    #[test]
    fn test_keyed_href_extraction_handles_absence() {
        let html = "<html><body><a href=\"/other\">nothing keyed</a></body></html>";
        assert_eq!(extract_keyed_href(html), None);
    }

    #[test]
    fn test_absolutize_joins_relative_and_keeps_absolute() {
        assert_eq!(
            absolutize("get.php?md5=X&key=Y", "https://libgen.li"),
            Some("https://libgen.li/get.php?md5=X&key=Y".to_string())
        );
        assert_eq!(
            absolutize("https://cdn.example.org/get?key=Y", "https://libgen.li"),
            Some("https://cdn.example.org/get?key=Y".to_string())
        );
    }
}

//! Batch cover-image enrichment via the mirror's JSON metadata endpoint.
//!
//! One `json.php` lookup covers a whole result set: all identifiers are sent
//! as a comma-separated list and the response maps each back to an optional
//! open-library key, from which a cover URL is templated. Records the
//! endpoint does not know, or knows without a key, keep an empty cover link.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::book::Book;
use crate::config::MirrorConfig;
use crate::error::ClientError;

/// One entry of the `json.php` response for `fields=id,openlibraryid`.
#[derive(Debug, Deserialize)]
struct MetadataEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    openlibraryid: String,
}

/// Attaches cover-image URLs to every book the metadata endpoint knows.
///
/// Issues a single batch lookup for all identifiers. A failure here is
/// recoverable by design: the books themselves are untouched except for
/// cover links, so callers can keep the parsed results and retry enrichment
/// later.
///
/// # Errors
///
/// Returns [`ClientError::Http`] or [`ClientError::UnexpectedStatus`] when
/// the lookup cannot be fetched, and [`ClientError::Metadata`] when the body
/// does not decode as the expected JSON array.
#[tracing::instrument(skip_all, fields(batch = books.len()))]
pub(crate) async fn attach_cover_links(
    client: &Client,
    config: &MirrorConfig,
    books: &mut [Book],
) -> Result<(), ClientError> {
    if books.is_empty() {
        return Ok(());
    }

    let ids = books
        .iter()
        .map(|book| book.id.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let url = format!(
        "{}/json.php?ids={ids}&fields=id,openlibraryid",
        config.search_base()
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ClientError::http(&url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::unexpected_status(&url, status.as_u16()));
    }

    let entries: Vec<MetadataEntry> = response
        .json()
        .await
        .map_err(|e| ClientError::metadata(e.to_string()))?;

    debug!(entries = entries.len(), "received metadata batch");
    assign_cover_links(config, &entries, books);
    Ok(())
}

/// Cross-references metadata entries back onto books by identifier.
fn assign_cover_links(config: &MirrorConfig, entries: &[MetadataEntry], books: &mut [Book]) {
    let keys_by_id: HashMap<&str, &str> = entries
        .iter()
        .map(|entry| (entry.id.as_str(), entry.openlibraryid.as_str()))
        .collect();

    for book in books {
        match keys_by_id.get(book.id.as_str()) {
            Some(key) if !key.is_empty() => {
                book.cover_link = format!("{}/b/olid/{key}-M.jpg", config.cover_base());
            }
            _ => book.cover_link.clear(),
        }
    }
}

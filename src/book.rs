//! The catalog record type.

use serde::Serialize;

/// One catalog entry parsed from a search-results row.
///
/// `id`, `md5`, and `title` are always non-empty on records produced by the
/// parser; every other descriptive field is free text from the mirror and may
/// be empty. `download_link` is derived during parsing;
/// `alternative_download_link` and `cover_link` stay empty until the
/// corresponding enrichment runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Catalog identifier. Numeric-looking and unique per mirror.
    pub id: String,
    /// MD5 digest of the file content, also a download path component.
    pub md5: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: String,
    pub language: String,
    pub pages: String,
    pub size: String,
    /// File extension, e.g. `pdf` or `epub`.
    pub extension: String,
    /// Direct download URL on the primary download mirror.
    pub download_link: String,
    /// Download URL on the alternative mirror, resolved on demand via
    /// [`crate::query::LibgenClient::attach_alternative_link`].
    pub alternative_download_link: String,
    /// Cover-image URL, populated by cover enrichment when the catalog knows
    /// a matching open-library key.
    pub cover_link: String,
}

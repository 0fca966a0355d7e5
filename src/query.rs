//! The search orchestrator: [`LibgenClient`] and [`Query`].

use reqwest::Client;
use tracing::{debug, warn};

use crate::book::Book;
use crate::config::MirrorConfig;
use crate::cover;
use crate::error::ClientError;
use crate::field::SearchField;
use crate::http;
use crate::links;
use crate::parse::parse_search_page;
use crate::url::search_url;

/// Client holding the mirror configuration and the shared HTTP client.
///
/// Cheap to clone; clones share the underlying connection pool. Safe to use
/// from multiple tasks concurrently, though callers hammering the mirrors in
/// parallel will get themselves blocked.
#[derive(Debug, Clone)]
pub struct LibgenClient {
    config: MirrorConfig,
    http: Client,
}

impl LibgenClient {
    /// Creates a client against the default production mirrors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientBuild`] when HTTP client construction
    /// fails.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(MirrorConfig::default())
    }

    /// Creates a client with custom mirror endpoints (also used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientBuild`] when HTTP client construction
    /// fails.
    pub fn with_config(config: MirrorConfig) -> Result<Self, ClientError> {
        let http = http::build_http_client(&config)?;
        Ok(Self { config, http })
    }

    /// The active mirror configuration.
    #[must_use]
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Resolves a download link on the alternative mirror for one MD5.
    ///
    /// Opt-in per record because it costs one full page fetch. `Ok(None)`
    /// means the redirect page carried no keyed link, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] or [`ClientError::UnexpectedStatus`]
    /// when the redirect page cannot be fetched.
    pub async fn alternative_download_link(
        &self,
        md5: &str,
    ) -> Result<Option<String>, ClientError> {
        links::resolve_alternative_link(&self.http, &self.config, md5).await
    }

    /// Resolves and stores the alternative download link on a book.
    ///
    /// Leaves `alternative_download_link` empty when the mirror offers none.
    ///
    /// # Errors
    ///
    /// Same as [`LibgenClient::alternative_download_link`].
    pub async fn attach_alternative_link(&self, book: &mut Book) -> Result<(), ClientError> {
        if let Some(link) = self.alternative_download_link(&book.md5).await? {
            book.alternative_download_link = link;
        }
        Ok(())
    }

    /// Re-runs cover enrichment for a slice of books.
    ///
    /// Useful after a [`Query::search`] that returned a recoverable
    /// [`ClientError::Metadata`] error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Metadata`] on a malformed metadata response,
    /// or [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] when the
    /// lookup cannot be fetched. All of these leave `books` usable.
    pub async fn attach_cover_links(&self, books: &mut [Book]) -> Result<(), ClientError> {
        cover::attach_cover_links(&self.http, &self.config, books).await
    }
}

/// One catalog search: term, field selector, and (after searching) results.
///
/// A query transitions from unsearched to searched exactly once. A failed
/// fetch or parse leaves it unsearched and retryable; a second search on a
/// searched query is an error.
#[derive(Debug, Clone)]
pub struct Query {
    field: SearchField,
    term: String,
    limit: Option<u32>,
    search_url: Option<String>,
    results: Vec<Book>,
    searched: bool,
}

impl Query {
    /// Creates an unsearched query for `term` matched against `field`.
    #[must_use]
    pub fn new(field: SearchField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
            limit: None,
            search_url: None,
            results: Vec::new(),
            searched: false,
        }
    }

    /// Overrides the configured default result limit for this query.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The catalog column this query matches against.
    #[must_use]
    pub fn field(&self) -> SearchField {
        self.field
    }

    /// The free-text search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The resolved search URL, set once the search has run.
    #[must_use]
    pub fn search_url(&self) -> Option<&str> {
        self.search_url.as_deref()
    }

    /// True once the query has transitioned to searched.
    #[must_use]
    pub fn is_searched(&self) -> bool {
        self.searched
    }

    /// The ordered search results. Empty until searched.
    #[must_use]
    pub fn results(&self) -> &[Book] {
        &self.results
    }

    /// Consumes the query, yielding its results.
    #[must_use]
    pub fn into_results(self) -> Vec<Book> {
        self.results
    }

    /// Runs the search: builds the URL, fetches and parses the results page,
    /// then enriches the batch with cover links.
    ///
    /// Cover enrichment failing does NOT discard results: the query still
    /// transitions to searched with its parsed records, and the recoverable
    /// [`ClientError::Metadata`] (or fetch) error is returned so the caller
    /// knows covers are missing. Use
    /// [`LibgenClient::attach_cover_links`] to retry enrichment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadySearched`] on a second call,
    /// [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] when the
    /// search page cannot be fetched (the query stays unsearched), and the
    /// recoverable enrichment errors described above.
    #[tracing::instrument(skip(self, client), fields(field = %self.field, term = %self.term))]
    pub async fn search(&mut self, client: &LibgenClient) -> Result<(), ClientError> {
        if self.searched {
            return Err(ClientError::already_searched(&self.term));
        }

        let config = client.config();
        let limit = self.limit.unwrap_or(config.default_result_limit);
        let url = search_url(config, &self.term, self.field, limit);

        let html = http::fetch_text(&client.http, &url).await?;
        let mut results = parse_search_page(&html, config);
        debug!(url = %url, results = results.len(), "search page parsed");

        let enrichment = cover::attach_cover_links(&client.http, config, &mut results).await;

        self.search_url = Some(url);
        self.results = results;
        self.searched = true;

        if let Err(error) = enrichment {
            warn!(error = %error, "cover enrichment failed; keeping results without covers");
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_is_unsearched_and_empty() {
        let query = Query::new(SearchField::Author, "Marx");
        assert!(!query.is_searched());
        assert!(query.results().is_empty());
        assert_eq!(query.search_url(), None);
        assert_eq!(query.term(), "Marx");
        assert_eq!(query.field(), SearchField::Author);
    }

    #[test]
    fn test_with_limit_overrides_default() {
        let query = Query::new(SearchField::Default, "economics").with_limit(100);
        assert_eq!(query.limit, Some(100));
    }
}

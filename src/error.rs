//! Error types for client operations.
//!
//! This module defines structured errors for search, link resolution, and
//! cover enrichment, following the What/Why/Fix pattern used across the
//! project. Structurally broken HTML is never an error: malformed rows are
//! filtered out during parsing instead (see [`crate::parse`]).

use thiserror::Error;

/// Errors that can occur while talking to the catalog mirrors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {reason}\n  Suggestion: check the configured timeouts and TLS availability")]
    ClientBuild {
        /// Why construction failed
        reason: String,
    },

    /// Transport-level failure (DNS, connect, timeout, body read) on a fetch
    #[error("request to '{url}' failed: {source}\n  Suggestion: check connectivity and whether the mirror is up")]
    Http {
        /// The URL that was being fetched
        url: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The mirror answered with a non-success HTTP status
    #[error("'{url}' returned HTTP {status}\n  Suggestion: the mirror may be overloaded or blocking automated traffic; retry later or switch mirrors")]
    UnexpectedStatus {
        /// The URL that was fetched
        url: String,
        /// The status code received
        status: u16,
    },

    /// The metadata endpoint returned a body that did not decode as the
    /// expected JSON array. Recoverable: already-parsed search results are
    /// retained, only cover links are missing.
    #[error("cover metadata lookup failed: {reason}\n  Suggestion: results are still usable without cover links; retry enrichment separately")]
    Metadata {
        /// Why the metadata response was unusable
        reason: String,
    },

    /// The query was already searched; a `Query` transitions exactly once
    #[error("query for '{term}' has already been searched\n  Suggestion: construct a new Query to search again")]
    AlreadySearched {
        /// The search term of the exhausted query
        term: String,
    },
}

impl ClientError {
    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            reason: reason.into(),
        }
    }

    /// Creates an `Http` error for a failed fetch of `url`.
    #[must_use]
    pub fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }

    /// Creates an `UnexpectedStatus` error.
    #[must_use]
    pub fn unexpected_status(url: &str, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `Metadata` error.
    #[must_use]
    pub fn metadata(reason: impl Into<String>) -> Self {
        Self::Metadata {
            reason: reason.into(),
        }
    }

    /// Creates an `AlreadySearched` error.
    #[must_use]
    pub fn already_searched(term: &str) -> Self {
        Self::AlreadySearched {
            term: term.to_string(),
        }
    }

    /// True when the error leaves search results intact (cover enrichment
    /// failures only).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_suggestions() {
        let err = ClientError::unexpected_status("https://libgen.is/search.php", 503);
        let text = err.to_string();
        assert!(text.contains("HTTP 503"));
        assert!(text.contains("Suggestion:"));
    }

    #[test]
    fn test_only_metadata_errors_are_recoverable() {
        assert!(ClientError::metadata("bad json").is_recoverable());
        assert!(!ClientError::unexpected_status("u", 500).is_recoverable());
        assert!(!ClientError::already_searched("marx").is_recoverable());
    }
}

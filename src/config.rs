//! Mirror configuration: hosts, result limits, and HTTP client policy.
//!
//! The reference mirrors are embedded as defaults rather than hard-coded at
//! call sites so tests and downstream tools can point every endpoint at an
//! alternate host (e.g. a mock server) without touching the core logic.

/// Default search mirror, serving `search.php` and `json.php`.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://libgen.is";

/// Default direct-download mirror, serving sharded `/main/...` paths.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://download.library.lol";

/// Default alternative mirror, serving the `ads.php` redirect page.
pub const DEFAULT_ALTERNATIVE_BASE_URL: &str = "https://libgen.li";

/// Default cover-image host. Only ever used to construct URL strings;
/// the library never issues requests against it.
pub const DEFAULT_COVER_BASE_URL: &str = "https://covers.openlibrary.org";

/// Default number of results requested per search.
pub const DEFAULT_RESULT_LIMIT: u32 = 25;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Configuration for all mirror endpoints and client behavior.
///
/// Construct with [`MirrorConfig::default`] for the production mirrors, then
/// override individual fields as needed:
///
/// ```
/// use libgen_client::MirrorConfig;
///
/// let config = MirrorConfig {
///     default_result_limit: 100,
///     ..MirrorConfig::default()
/// };
/// assert_eq!(config.search_base_url, "https://libgen.is");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Base URL of the search mirror (`search.php`, `json.php`).
    pub search_base_url: String,
    /// Base URL of the direct-download mirror.
    pub download_base_url: String,
    /// Base URL of the alternative mirror (`ads.php` redirect page).
    pub alternative_base_url: String,
    /// Base URL of the cover-image host.
    pub cover_base_url: String,
    /// Result limit used when a query does not specify one.
    pub default_result_limit: u32,
    /// When true, the full query string is percent-encoded. When false only
    /// spaces become `%20`, matching the reference mirror's lenient parsing.
    pub strict_query_encoding: bool,
    /// TCP connect timeout for every outbound fetch, in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout for every outbound fetch, in seconds.
    pub read_timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            alternative_base_url: DEFAULT_ALTERNATIVE_BASE_URL.to_string(),
            cover_base_url: DEFAULT_COVER_BASE_URL.to_string(),
            default_result_limit: DEFAULT_RESULT_LIMIT,
            strict_query_encoding: false,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl MirrorConfig {
    /// Returns `search_base_url` without a trailing slash.
    #[must_use]
    pub fn search_base(&self) -> &str {
        self.search_base_url.trim_end_matches('/')
    }

    /// Returns `download_base_url` without a trailing slash.
    #[must_use]
    pub fn download_base(&self) -> &str {
        self.download_base_url.trim_end_matches('/')
    }

    /// Returns `alternative_base_url` without a trailing slash.
    #[must_use]
    pub fn alternative_base(&self) -> &str {
        self.alternative_base_url.trim_end_matches('/')
    }

    /// Returns `cover_base_url` without a trailing slash.
    #[must_use]
    pub fn cover_base(&self) -> &str {
        self.cover_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_production_mirrors() {
        let config = MirrorConfig::default();
        assert_eq!(config.search_base_url, "https://libgen.is");
        assert_eq!(config.download_base_url, "https://download.library.lol");
        assert_eq!(config.alternative_base_url, "https://libgen.li");
        assert_eq!(config.default_result_limit, 25);
        assert!(!config.strict_query_encoding);
    }

    #[test]
    fn test_base_accessors_strip_trailing_slash() {
        let config = MirrorConfig {
            search_base_url: "http://127.0.0.1:8080/".to_string(),
            ..MirrorConfig::default()
        };
        assert_eq!(config.search_base(), "http://127.0.0.1:8080");
        assert_eq!(config.download_base(), "https://download.library.lol");
    }
}

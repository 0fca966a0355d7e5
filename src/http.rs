//! Shared HTTP client construction policy.
//!
//! Centralizes networking defaults so every fetch stays consistent on
//! timeout, user-agent, compression, and cookie support. The header profile
//! mimics a desktop Firefox session; the mirrors serve different (or no)
//! content to clients that look like bots.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

use crate::config::MirrorConfig;
use crate::error::ClientError;

/// Browser user-agent sent on every request.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:130.0) Gecko/20100101 Firefox/130.0";

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/png,image/svg+xml,*/*;q=0.8";

/// Builds the shared HTTP client from the configured policy.
///
/// # Errors
///
/// Returns [`ClientError::ClientBuild`] when client construction fails.
pub(crate) fn build_http_client(config: &MirrorConfig) -> Result<Client, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Sec-GPC", HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .build()
        .map_err(|e| ClientError::client_build(e.to_string()))
}

/// Fetches `url` and returns the response body as text.
///
/// # Errors
///
/// Returns [`ClientError::Http`] on transport failure and
/// [`ClientError::UnexpectedStatus`] on a non-2xx response.
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String, ClientError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClientError::http(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::unexpected_status(url, status.as_u16()));
    }

    response.text().await.map_err(|e| ClientError::http(url, e))
}

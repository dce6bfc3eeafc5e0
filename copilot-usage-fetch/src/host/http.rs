//! HTTP client with timeout, user agent, and tracing.
//!
//! Thin wrapper over [`reqwest::Client`] that adds:
//! - A bounded request timeout
//! - A stable user agent
//! - Request/response tracing
//! - Sensitive bearer header construction

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent string for outbound requests.
const USER_AGENT: &str = concat!("copilot-usage/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with timeout and tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { inner, timeout })
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs a GET request with custom headers.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` on transport failure or timeout. Non-success
    /// statuses are returned as a normal `Response`.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_with_headers(
        &self,
        url: &Url,
        headers: HeaderMap,
    ) -> Result<Response, HttpError> {
        debug!("GET request with headers");

        let response = self.inner.get(url.clone()).headers(headers).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

/// Builds a `Bearer` authorization header value, marked sensitive.
///
/// # Errors
///
/// Returns `HttpError::InvalidHeader` if the token contains characters
/// that cannot appear in a header.
pub fn bearer_header(token: &str) -> Result<HeaderValue, HttpError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Check if the response indicates rate limiting.
    fn is_rate_limited(&self) -> bool;

    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(3)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));

        let client = HttpClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_bearer_header() {
        let value = bearer_header("ghp_abc123").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer ghp_abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_header_rejects_newlines() {
        assert!(matches!(
            bearer_header("bad\ntoken"),
            Err(HttpError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("copilot-usage/"));
    }
}

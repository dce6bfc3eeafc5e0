//! Premium-request billing usage backend.
//!
//! Queries the per-user billing report for the current UTC month and sums
//! the gross quantity of Copilot premium-request line items. Gross is used
//! because plans with a 100% discount (e.g. the student pack) report a net
//! quantity of zero.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use copilot_usage_core::{QuotaReport, UsageSnapshot};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{QuotaBackend, read_success_body};
use crate::GITHUB_API_BASE;
use crate::credentials::Credentials;
use crate::error::{FetchError, HttpError};
use crate::host::http::{HttpClient, bearer_header};

// ============================================================================
// Constants
// ============================================================================

/// Monthly premium-request quota assumed when none is configured.
pub const DEFAULT_QUOTA: u32 = 300;

/// GitHub API version header.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Product name of Copilot line items.
const COPILOT_PRODUCT: &str = "Copilot";

/// SKU fragment identifying premium requests.
const PREMIUM_REQUEST_SKU: &str = "Premium Request";

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the premium-request billing usage API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingUsageResponse {
    /// Billed line items for the period.
    #[serde(default)]
    pub usage_items: Vec<UsageItem>,

    /// Account the report belongs to.
    #[serde(default)]
    pub user: Option<String>,
}

/// One billed line item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageItem {
    /// Product name (e.g. "Copilot").
    #[serde(default)]
    pub product: String,

    /// SKU (e.g. "Copilot Premium Request").
    #[serde(default)]
    pub sku: String,

    /// Model the requests were served by.
    #[serde(default)]
    pub model: Option<String>,

    /// Quantity before discounts.
    #[serde(default)]
    pub gross_quantity: f64,

    /// Quantity after discounts.
    #[serde(default)]
    pub net_quantity: f64,
}

impl UsageItem {
    /// Returns true for Copilot premium-request line items.
    pub fn is_premium_request(&self) -> bool {
        self.product == COPILOT_PRODUCT && self.sku.contains(PREMIUM_REQUEST_SKU)
    }
}

impl BillingUsageResponse {
    /// Sums the gross quantity of all premium-request line items.
    pub fn premium_requests_used(&self) -> f64 {
        self.usage_items
            .iter()
            .filter(|item| item.is_premium_request())
            .map(|item| item.gross_quantity)
            .sum()
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Quota backend over the billing usage endpoint.
#[derive(Debug, Clone)]
pub struct BillingUsageBackend {
    http: HttpClient,
    api_base: String,
    quota: u32,
}

impl BillingUsageBackend {
    /// Creates a backend against the public GitHub API.
    pub fn new(http: HttpClient, quota: u32) -> Self {
        Self::with_api_base(http, GITHUB_API_BASE, quota)
    }

    /// Creates a backend against a custom API base URL.
    pub fn with_api_base(http: HttpClient, api_base: impl Into<String>, quota: u32) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            quota,
        }
    }

    /// Returns the configured monthly quota.
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Builds the usage URL for a user and billing month.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidUrl` if the API base cannot carry a path.
    pub fn usage_url(&self, username: &str, now: DateTime<Utc>) -> Result<Url, HttpError> {
        let mut url = Url::parse(&self.api_base)?;

        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend([
                "users",
                username,
                "settings",
                "billing",
                "premium_request",
                "usage",
            ]);

        url.query_pairs_mut()
            .append_pair("year", &now.year().to_string())
            .append_pair("month", &now.month().to_string());

        Ok(url)
    }

    /// Reduces a response body to a report.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Json` for malformed bodies.
    pub fn parse_response(&self, body: &str) -> Result<QuotaReport, FetchError> {
        let response: BillingUsageResponse = serde_json::from_str(body)?;
        let used = response.premium_requests_used();

        debug!(
            items = response.usage_items.len(),
            used,
            quota = self.quota,
            "Summed premium requests"
        );

        let snapshot = UsageSnapshot::from_used(used, f64::from(self.quota));
        snapshot.validate()?;
        Ok(QuotaReport::Metered(snapshot))
    }

    fn build_headers(token: &str) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(AUTHORIZATION, bearer_header(token)?);
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        Ok(headers)
    }
}

#[async_trait]
impl QuotaBackend for BillingUsageBackend {
    fn id(&self) -> &'static str {
        "copilot.billing"
    }

    fn requires_username(&self) -> bool {
        true
    }

    #[instrument(skip_all, fields(backend = "copilot.billing"))]
    async fn fetch(&self, credentials: &Credentials) -> Result<QuotaReport, FetchError> {
        let username = credentials
            .username
            .as_deref()
            .ok_or(FetchError::MissingCredential("username"))?;

        let url = self.usage_url(username, Utc::now())?;
        let headers = Self::build_headers(&credentials.token)?;

        let response = self.http.get_with_headers(&url, headers).await?;
        let body = read_success_body(self.id(), response).await?;

        self.parse_response(&body)
    }
}

// ============================================================================
// Tests
// ============================================================================

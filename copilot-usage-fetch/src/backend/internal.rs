//! Copilot internal user quota backend.
//!
//! Reads the `premium_interactions` quota snapshot that the Copilot user
//! endpoint reports. Unlimited plans (and accounts with no premium quota at
//! all) have nothing meaningful to show and report [`QuotaReport::Unmetered`].

use async_trait::async_trait;
use copilot_usage_core::{QuotaReport, UsageSnapshot};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{QuotaBackend, read_success_body};
use crate::GITHUB_API_BASE;
use crate::credentials::Credentials;
use crate::error::{FetchError, HttpError};
use crate::host::http::{HttpClient, bearer_header};

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the Copilot user endpoint.
#[derive(Debug, Deserialize)]
pub struct CopilotUserResponse {
    /// Copilot plan (e.g. "individual", "business").
    #[serde(default)]
    pub copilot_plan: Option<String>,

    /// Date the monthly quota resets.
    #[serde(default)]
    pub quota_reset_date: Option<String>,

    /// Quota snapshots per usage category.
    #[serde(default)]
    pub quota_snapshots: Option<QuotaSnapshots>,
}

/// Quota snapshots per usage category.
#[derive(Debug, Deserialize)]
pub struct QuotaSnapshots {
    /// Premium model interactions.
    #[serde(default)]
    pub premium_interactions: Option<QuotaSnapshot>,
}

/// Point-in-time view of one usage category.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSnapshot {
    /// Requests included in the plan.
    #[serde(default)]
    pub entitlement: f64,

    /// Requests left in the period.
    #[serde(default)]
    pub remaining: f64,

    /// Share of the entitlement left, in percent.
    #[serde(default)]
    pub percent_remaining: Option<f64>,

    /// Whether the category has no limit.
    #[serde(default)]
    pub unlimited: bool,
}

impl CopilotUserResponse {
    /// Returns the premium-interactions snapshot, if reported.
    pub fn premium_interactions(&self) -> Option<&QuotaSnapshot> {
        self.quota_snapshots.as_ref()?.premium_interactions.as_ref()
    }

    /// Reduces the response to a report.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Core` if the snapshot values are inconsistent.
    pub fn to_report(&self) -> Result<QuotaReport, FetchError> {
        let Some(premium) = self.premium_interactions() else {
            debug!("No premium interactions snapshot");
            return Ok(QuotaReport::Unmetered);
        };

        if premium.unlimited || premium.entitlement <= 0.0 {
            debug!(
                unlimited = premium.unlimited,
                entitlement = premium.entitlement,
                "Premium interactions are unmetered"
            );
            return Ok(QuotaReport::Unmetered);
        }

        let snapshot = UsageSnapshot::from_remaining(premium.entitlement, premium.remaining);
        snapshot.validate()?;
        Ok(QuotaReport::Metered(snapshot))
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Quota backend over the Copilot internal user endpoint.
#[derive(Debug, Clone)]
pub struct CopilotInternalBackend {
    http: HttpClient,
    api_base: String,
}

impl CopilotInternalBackend {
    /// Creates a backend against the public GitHub API.
    pub fn new(http: HttpClient) -> Self {
        Self::with_api_base(http, GITHUB_API_BASE)
    }

    /// Creates a backend against a custom API base URL.
    pub fn with_api_base(http: HttpClient, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    /// Builds the user endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidUrl` if the API base cannot carry a path.
    pub fn user_url(&self) -> Result<Url, HttpError> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["copilot_internal", "user"]);
        Ok(url)
    }

    fn build_headers(token: &str) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_header(token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl QuotaBackend for CopilotInternalBackend {
    fn id(&self) -> &'static str {
        "copilot.internal"
    }

    #[instrument(skip_all, fields(backend = "copilot.internal"))]
    async fn fetch(&self, credentials: &Credentials) -> Result<QuotaReport, FetchError> {
        let url = self.user_url()?;
        let headers = Self::build_headers(&credentials.token)?;

        let response = self.http.get_with_headers(&url, headers).await?;
        let body = read_success_body(self.id(), response).await?;

        let user: CopilotUserResponse = serde_json::from_str(&body)?;
        debug!(
            plan = user.copilot_plan.as_deref().unwrap_or("unknown"),
            reset = user.quota_reset_date.as_deref().unwrap_or("unknown"),
            "Parsed Copilot user quota"
        );
        user.to_report()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CopilotUserResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_user_url() {
        let backend = CopilotInternalBackend::new(HttpClient::new().unwrap());
        assert_eq!(
            backend.user_url().unwrap().as_str(),
            "https://api.github.com/copilot_internal/user"
        );
        assert!(!backend.requires_username());
    }

    #[test]
    fn test_metered_snapshot() {
        let user = parse(
            r#"{
                "copilot_plan": "individual",
                "quota_reset_date": "2025-08-01",
                "quota_snapshots": {
                    "chat": {"entitlement": 0, "remaining": 0, "unlimited": true},
                    "premium_interactions": {
                        "entitlement": 300,
                        "remaining": 15,
                        "percent_remaining": 5.0,
                        "unlimited": false
                    }
                }
            }"#,
        );

        let report = user.to_report().unwrap();
        let snapshot = report.snapshot().unwrap();
        assert_eq!(snapshot.used, 285.0);
        assert_eq!(snapshot.quota, 300.0);
        assert_eq!(snapshot.remaining, 15.0);
    }

    #[test]
    fn test_unlimited_is_unmetered() {
        let user = parse(
            r#"{"quota_snapshots": {"premium_interactions": {"entitlement": 0, "remaining": 0, "unlimited": true}}}"#,
        );
        assert_eq!(user.to_report().unwrap(), QuotaReport::Unmetered);
    }

    #[test]
    fn test_absent_snapshot_is_unmetered() {
        assert_eq!(parse("{}").to_report().unwrap(), QuotaReport::Unmetered);
        assert_eq!(
            parse(r#"{"quota_snapshots": {}}"#).to_report().unwrap(),
            QuotaReport::Unmetered
        );
    }

    #[test]
    fn test_inconsistent_snapshot_is_error() {
        let user = parse(
            r#"{"quota_snapshots": {"premium_interactions": {"entitlement": 300, "remaining": 400}}}"#,
        );
        assert!(matches!(user.to_report(), Err(FetchError::Core(_))));
    }
}

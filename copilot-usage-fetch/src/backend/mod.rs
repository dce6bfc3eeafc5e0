//! Quota backends.
//!
//! A [`QuotaBackend`] performs one authenticated GET against GitHub and
//! reduces the response to a [`QuotaReport`]. Two endpoints are supported:
//!
//! - [`BillingUsageBackend`] - `/users/{user}/settings/billing/premium_request/usage`
//! - [`CopilotInternalBackend`] - `/copilot_internal/user`
//!
//! Backends report failures as [`FetchError`]; converting them into a
//! user-facing soft failure is the caller's job.

mod billing;
mod internal;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use copilot_usage_core::QuotaReport;
use reqwest::Response;
use tracing::warn;

use crate::credentials::Credentials;
use crate::error::{FetchError, HttpError};
use crate::host::http::ResponseExt;

pub use billing::{BillingUsageBackend, BillingUsageResponse, DEFAULT_QUOTA, UsageItem};
pub use internal::{CopilotInternalBackend, CopilotUserResponse, QuotaSnapshot};

// ============================================================================
// Backend Kind
// ============================================================================

/// Which quota endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Premium-request billing usage items.
    #[default]
    Billing,
    /// Copilot internal user quota snapshot.
    Internal,
}

impl BackendKind {
    /// Returns the configuration name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Internal => "internal",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "billing" => Ok(Self::Billing),
            "internal" | "copilot-internal" => Ok(Self::Internal),
            other => Err(format!("unknown quota backend: {other}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Quota Backend Trait
// ============================================================================

/// A GitHub endpoint that reports premium-request quota.
#[async_trait]
pub trait QuotaBackend: Send + Sync {
    /// Identifier for logging (e.g. `"copilot.billing"`).
    fn id(&self) -> &'static str;

    /// Whether credentials must carry a username.
    fn requires_username(&self) -> bool {
        false
    }

    /// Fetches the current quota.
    async fn fetch(&self, credentials: &Credentials) -> Result<QuotaReport, FetchError>;
}

/// Maps the response status to an error, or reads the body on success.
async fn read_success_body(backend: &str, response: Response) -> Result<String, FetchError> {
    let status = response.status();

    if response.is_rate_limited() {
        let retry_after = response.retry_after_secs();
        warn!(backend, status = %status, ?retry_after, "API rate limited");
        return Err(FetchError::RateLimited { retry_after });
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        warn!(backend, status = %status, "API rejected token");
        return Err(FetchError::AuthenticationFailed("Token rejected".to_string()));
    }

    if !status.is_success() {
        warn!(backend, status = %status, "API error");
        return Err(FetchError::Api {
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Http(HttpError::from(e)))
}

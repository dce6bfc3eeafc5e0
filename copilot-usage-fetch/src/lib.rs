// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Copilot Usage Fetch
//!
//! Credential sources and GitHub quota backends for the Copilot usage
//! reporter.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with timeout, user agent, and tracing
//!
//! ## Credentials
//!
//! The [`credentials`] module resolves a GitHub token through one of two
//! pluggable sources:
//!
//! - [`EnvCredentials`] - `GITHUB_USERNAME` + `GITHUB_PAT`
//! - [`AuthFileCredentials`] - the host's stored `github-copilot` refresh token
//!
//! ## Quota Backends
//!
//! The [`backend`] module queries one of two GitHub endpoints:
//!
//! - [`BillingUsageBackend`] - premium-request billing usage items
//! - [`CopilotInternalBackend`] - the Copilot user quota snapshot
//!
//! ## Example
//!
//! ```ignore
//! use copilot_usage_fetch::{BillingUsageBackend, CredentialSource, EnvCredentials, HttpClient, QuotaBackend};
//!
//! let credentials = EnvCredentials::from_env().resolve().ok_or("no credentials")?;
//! let backend = BillingUsageBackend::new(HttpClient::new()?, 300);
//! let report = backend.fetch(&credentials).await?;
//! ```

pub mod backend;
pub mod credentials;
pub mod error;
pub mod host;

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{HttpClient, ResponseExt};

// Credentials
pub use credentials::{
    AuthFileCredentials, CredentialKind, CredentialSource, Credentials, EnvCredentials,
};

// Backends
pub use backend::{BackendKind, BillingUsageBackend, CopilotInternalBackend, QuotaBackend};

/// Default GitHub REST API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

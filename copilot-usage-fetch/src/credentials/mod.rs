//! Credential resolution.
//!
//! A [`CredentialSource`] turns externally supplied secrets into
//! [`Credentials`]. Sources never fail loudly: anything missing or
//! unreadable resolves to `None`, and the caller decides how to tell the
//! user (see [`CredentialSource::missing_hint`]).
//!
//! Two sources exist; one is active per deployment:
//!
//! 1. **Environment** ([`EnvCredentials`]) - `GITHUB_USERNAME` + `GITHUB_PAT`
//! 2. **Auth file** ([`AuthFileCredentials`]) - the host's stored refresh token

mod auth_file;
mod env;

use std::fmt;
use std::str::FromStr;

pub use auth_file::AuthFileCredentials;
pub use env::{EnvCredentials, GITHUB_PAT_ENV, GITHUB_USERNAME_ENV};

// ============================================================================
// Credentials
// ============================================================================

/// A resolved GitHub token, optionally paired with a username.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// GitHub login, required by the billing endpoint.
    pub username: Option<String>,
    /// Bearer token.
    pub token: String,
}

impl Credentials {
    /// Creates credentials with a username.
    pub fn with_username(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            token: token.into(),
        }
    }

    /// Creates token-only credentials.
    pub fn token_only(token: impl Into<String>) -> Self {
        Self {
            username: None,
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Credential Source
// ============================================================================

/// Where credentials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialKind {
    /// Process environment.
    #[default]
    Env,
    /// Host auth file.
    AuthFile,
}

impl CredentialKind {
    /// Returns the configuration name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::AuthFile => "auth-file",
        }
    }
}

impl FromStr for CredentialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" | "environment" => Ok(Self::Env),
            "auth-file" | "auth_file" | "file" => Ok(Self::AuthFile),
            other => Err(format!("unknown credential source: {other}")),
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pluggable source of GitHub credentials.
pub trait CredentialSource: Send + Sync {
    /// Identifier for logging (e.g. `"env"`).
    fn id(&self) -> &'static str;

    /// Resolves credentials, or `None` if they are unavailable.
    fn resolve(&self) -> Option<Credentials>;

    /// User-facing hint shown once when resolution fails.
    fn missing_hint(&self) -> String;
}

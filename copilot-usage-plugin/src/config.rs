//! Configuration management.
//!
//! Everything is read from the process environment once, when the plugin
//! loads. Unrecognised values fall back to defaults with a warning; the
//! plugin never refuses to start over configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `COPILOT_QUOTA` | `300` |
//! | `COPILOT_USAGE_BACKEND` | `billing` |
//! | `COPILOT_USAGE_CREDENTIALS` | `env` for billing, `auth-file` for internal |
//! | `COPILOT_AUTH_FILE` | `~/.local/share/opencode/auth.json` |
//! | `COPILOT_USAGE_API_BASE` | `https://api.github.com` |
//! | `COPILOT_USAGE_TIMEOUT_SECS` | `10` |
//! | `GITHUB_USERNAME`, `GITHUB_PAT` | unset |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use copilot_usage_fetch::backend::DEFAULT_QUOTA;
use copilot_usage_fetch::credentials::{GITHUB_PAT_ENV, GITHUB_USERNAME_ENV};
use copilot_usage_fetch::host::http::DEFAULT_TIMEOUT_SECS;
use copilot_usage_fetch::{AuthFileCredentials, BackendKind, CredentialKind, GITHUB_API_BASE};
use tracing::warn;

/// Monthly premium-request quota.
pub const QUOTA_ENV: &str = "COPILOT_QUOTA";
/// Quota backend selection.
pub const BACKEND_ENV: &str = "COPILOT_USAGE_BACKEND";
/// Credential source selection.
pub const CREDENTIALS_ENV: &str = "COPILOT_USAGE_CREDENTIALS";
/// Auth file override.
pub const AUTH_FILE_ENV: &str = "COPILOT_AUTH_FILE";
/// API base URL override.
pub const API_BASE_ENV: &str = "COPILOT_USAGE_API_BASE";
/// Request timeout override.
pub const TIMEOUT_ENV: &str = "COPILOT_USAGE_TIMEOUT_SECS";

/// Plugin configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Which quota endpoint to query.
    pub backend: BackendKind,
    /// Where credentials come from.
    pub credentials: CredentialKind,
    /// Monthly quota for the billing backend.
    pub quota: u32,
    /// Auth file read by the stored-credential source.
    pub auth_file: PathBuf,
    /// GitHub API base URL.
    pub api_base: String,
    /// Request timeout.
    pub timeout: Duration,
    /// `GITHUB_USERNAME`, for the environment credential source.
    pub github_username: Option<String>,
    /// `GITHUB_PAT`, for the environment credential source.
    pub github_pat: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            credentials: CredentialKind::default(),
            quota: DEFAULT_QUOTA,
            auth_file: AuthFileCredentials::default_path(),
            api_base: GITHUB_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            github_username: None,
            github_pat: None,
        }
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfig")
            .field("backend", &self.backend)
            .field("credentials", &self.credentials)
            .field("quota", &self.quota)
            .field("auth_file", &self.auth_file)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("github_username", &self.github_username)
            .field("github_pat", &self.github_pat.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PluginConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = get(BACKEND_ENV)
            .map_or(defaults.backend, |v| parse_or_default(BACKEND_ENV, &v, defaults.backend));

        let credentials = get(CREDENTIALS_ENV).map_or_else(
            || default_credentials_for(backend),
            |v| parse_or_default(CREDENTIALS_ENV, &v, default_credentials_for(backend)),
        );

        let quota = get(QUOTA_ENV).map_or(defaults.quota, |v| match parse_quota(&v) {
            Some(quota) => quota,
            None => {
                warn!(
                    var = QUOTA_ENV,
                    value = %v,
                    default = DEFAULT_QUOTA,
                    "Invalid quota, using default"
                );
                DEFAULT_QUOTA
            }
        });

        let timeout = get(TIMEOUT_ENV).map_or(defaults.timeout, |v| {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(var = TIMEOUT_ENV, value = %v, "Invalid timeout, using default");
                    defaults.timeout
                }
            }
        });

        Self {
            backend,
            credentials,
            quota,
            auth_file: get(AUTH_FILE_ENV).map_or(defaults.auth_file, PathBuf::from),
            api_base: get(API_BASE_ENV).unwrap_or(defaults.api_base),
            timeout,
            github_username: get(GITHUB_USERNAME_ENV),
            github_pat: get(GITHUB_PAT_ENV),
        }
    }
}

/// Credential source paired with each backend when none is configured.
fn default_credentials_for(backend: BackendKind) -> CredentialKind {
    match backend {
        BackendKind::Billing => CredentialKind::Env,
        BackendKind::Internal => CredentialKind::AuthFile,
    }
}

fn parse_or_default<T>(var: &str, value: &str, default: T) -> T
where
    T: FromStr<Err = String> + fmt::Display + Copy,
{
    value.parse().unwrap_or_else(|e: String| {
        warn!(var, value, error = %e, default = %default, "Invalid setting, using default");
        default
    })
}

/// Parses a quota the lenient way hosts do: leading whitespace and an
/// optional sign, then the leading run of digits. Only positive values
/// count; values past `u32::MAX` saturate.
pub fn parse_quota(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 || negative {
        return None;
    }

    // All digits, so only overflow can fail
    let quota = rest[..digits_len].parse::<u32>().unwrap_or(u32::MAX);
    (quota > 0).then_some(quota)
}

//! Environment credential source.

use tracing::debug;

use super::{CredentialSource, Credentials};

/// Environment variable holding the GitHub login.
pub const GITHUB_USERNAME_ENV: &str = "GITHUB_USERNAME";

/// Environment variable holding the personal access token.
pub const GITHUB_PAT_ENV: &str = "GITHUB_PAT";

/// Credentials read from `GITHUB_USERNAME` and `GITHUB_PAT`.
///
/// Values are captured once, when the plugin loads.
#[derive(Clone, Default)]
pub struct EnvCredentials {
    username: Option<String>,
    token: Option<String>,
}

impl EnvCredentials {
    /// Captures credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Captures credentials through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(GITHUB_USERNAME_ENV), lookup(GITHUB_PAT_ENV))
    }

    /// Creates a source from explicit values. Empty strings count as absent.
    pub fn new(username: Option<String>, token: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            username: non_empty(username),
            token: non_empty(token),
        }
    }
}

impl CredentialSource for EnvCredentials {
    fn id(&self) -> &'static str {
        "env"
    }

    fn resolve(&self) -> Option<Credentials> {
        match (&self.username, &self.token) {
            (Some(username), Some(token)) => {
                Some(Credentials::with_username(username.clone(), token.clone()))
            }
            _ => {
                debug!(
                    has_username = self.username.is_some(),
                    has_token = self.token.is_some(),
                    "Environment credentials incomplete"
                );
                None
            }
        }
    }

    fn missing_hint(&self) -> String {
        format!("Missing {GITHUB_USERNAME_ENV} or {GITHUB_PAT_ENV}")
    }
}

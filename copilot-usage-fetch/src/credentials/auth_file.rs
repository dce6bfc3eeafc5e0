//! Stored credential source.
//!
//! Reads the host's auth file, a JSON object keyed by provider id:
//!
//! ```json
//! {
//!   "github-copilot": {
//!     "type": "oauth",
//!     "refresh": "gho_...",
//!     "access": "...",
//!     "expires": 0
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CredentialSource, Credentials};

/// Auth file entry key for Copilot.
const COPILOT_ENTRY: &str = "github-copilot";

// ============================================================================
// Auth File Format
// ============================================================================

#[derive(Debug, Deserialize)]
struct AuthFile {
    #[serde(rename = "github-copilot")]
    github_copilot: Option<StoredAuth>,
}

#[derive(Debug, Deserialize)]
struct StoredAuth {
    #[serde(default)]
    refresh: Option<String>,
}

// ============================================================================
// Auth File Source
// ============================================================================

/// Credentials read from the host's stored `github-copilot` refresh token.
///
/// The file is read on every resolution so a login performed after the
/// plugin loaded is picked up.
#[derive(Debug, Clone)]
pub struct AuthFileCredentials {
    path: PathBuf,
}

impl AuthFileCredentials {
    /// Creates a source reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the host's default auth file location.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join("opencode")
            .join("auth.json")
    }

    /// Extracts the Copilot refresh token from auth file contents.
    fn parse_token(content: &str) -> Option<String> {
        let file: AuthFile = match serde_json::from_str(content) {
            Ok(file) => file,
            Err(e) => {
                debug!(error = %e, "Auth file is not valid JSON");
                return None;
            }
        };

        file.github_copilot?
            .refresh
            .filter(|token| !token.trim().is_empty())
    }
}

impl Default for AuthFileCredentials {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl CredentialSource for AuthFileCredentials {
    fn id(&self) -> &'static str {
        "auth-file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn resolve(&self) -> Option<Credentials> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(error = %e, "Auth file unreadable");
                return None;
            }
        };

        let token = Self::parse_token(&content);
        if token.is_none() {
            debug!(entry = COPILOT_ENTRY, "No Copilot refresh token in auth file");
        }
        token.map(Credentials::token_only)
    }

    fn missing_hint(&self) -> String {
        format!(
            "No GitHub Copilot credentials found in {}",
            self.path.display()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

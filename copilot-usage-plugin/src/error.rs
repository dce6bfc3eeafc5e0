//! Plugin error types.

use copilot_usage_fetch::HttpError;
use thiserror::Error;

/// Errors raised while setting up the reporter.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The HTTP client could not be created.
    #[error("HTTP setup failed: {0}")]
    Http(#[from] HttpError),
}

/// Errors raised while delivering a toast to the host.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Writing to the host failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The toast could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

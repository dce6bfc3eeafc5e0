//! Host toast notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title used for warnings (missing credentials, failed fetch).
pub const WARNING_TITLE: &str = "Copilot Usage";

/// Title used for the usage summary.
pub const USAGE_TITLE: &str = "Copilot Premium Requests";

/// Display time for warnings, in milliseconds.
pub const WARNING_DURATION_MS: u64 = 5_000;

/// Display time for the usage summary, in milliseconds.
pub const USAGE_DURATION_MS: u64 = 8_000;

/// Visual styling of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    /// Neutral information.
    #[default]
    Info,
    /// Positive confirmation.
    Success,
    /// Something needs attention.
    Warning,
    /// Something is critical.
    Error,
}

impl ToastVariant {
    /// Returns the wire name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ToastVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a host `showToast` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Toast title.
    pub title: String,
    /// Toast text, may span several lines.
    pub message: String,
    /// Visual styling.
    pub variant: ToastVariant,
    /// Display time in milliseconds.
    pub duration: u64,
}

impl Toast {
    /// Creates a toast.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        variant: ToastVariant,
        duration: u64,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant,
            duration,
        }
    }

    /// A short-lived warning under the generic title.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(WARNING_TITLE, message, ToastVariant::Warning, WARNING_DURATION_MS)
    }

    /// The usage summary toast.
    pub fn usage(message: impl Into<String>, variant: ToastVariant) -> Self {
        Self::new(USAGE_TITLE, message, variant, USAGE_DURATION_MS)
    }
}

/// Envelope matching the host's `showToast({ body })` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastRequest {
    /// The toast to display.
    pub body: Toast,
}

impl From<Toast> for ToastRequest {
    fn from(body: Toast) -> Self {
        Self { body }
    }
}

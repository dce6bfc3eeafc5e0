//! Domain models for the Copilot usage reporter.
//!
//! ## Submodules
//!
//! - [`usage`] - Usage types (UsageSnapshot, QuotaReport)
//! - [`event`] - Host lifecycle events (HostEvent, MessageInfo)
//! - [`toast`] - Host notifications (Toast, ToastVariant)

mod event;
mod toast;
mod usage;

// Re-export everything at the models level
pub use event::{HostEvent, MessageInfo, MessageUpdated, SessionIdle, is_copilot_provider};
pub use toast::{
    Toast, ToastRequest, ToastVariant, USAGE_DURATION_MS, USAGE_TITLE, WARNING_DURATION_MS,
    WARNING_TITLE,
};
pub use usage::{QuotaReport, UsageSnapshot};

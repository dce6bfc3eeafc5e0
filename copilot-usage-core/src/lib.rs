// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Copilot Usage Core
//!
//! Core types, models, and formatting for the Copilot usage reporter.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models (usage snapshots, host events, toasts)
//! - The presentation formatter (quota bar, number display, severity)
//! - The core error type
//!
//! ## Key Types
//!
//! - [`UsageSnapshot`] - Used/quota/remaining premium requests
//! - [`QuotaReport`] - Metered snapshot or unmetered plan
//! - [`HostEvent`] - Lifecycle events delivered by the host
//! - [`Toast`] - Notification body handed back to the host
//! - [`ToastVariant`] - Visual severity of a toast

pub mod error;
pub mod format;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Host events
    HostEvent,
    MessageInfo,
    MessageUpdated,
    SessionIdle,
    is_copilot_provider,
    // Toasts
    Toast,
    ToastRequest,
    ToastVariant,
    // Usage
    QuotaReport,
    UsageSnapshot,
};

// Re-export formatter entry points
pub use format::{
    DEFAULT_BAR_WIDTH, bar_cells, format_number, progress_bar, severity_for, usage_message,
    usage_percentage, usage_toast,
};

/// Provider id prefix shared by every Copilot-backed provider.
pub const COPILOT_PROVIDER_PREFIX: &str = "github-copilot";

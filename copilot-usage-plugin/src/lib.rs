// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Copilot Usage Plugin
//!
//! Host-side event handler that reports GitHub Copilot premium-request usage
//! after every chat session that ran on a Copilot provider.
//!
//! The host delivers lifecycle events one at a time. The handler remembers
//! which provider served the last assistant message; when the session goes
//! idle on a Copilot provider it resolves credentials, queries the quota
//! backend, and shows a toast:
//!
//! ```text
//! message.updated (assistant, github-copilot) ─► remember provider
//! session.idle ─► credentials ─► quota backend ─► format ─► toast
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`state`] - Per-process reporter state
//! - [`notifier`] - The narrow toast interface back to the host
//! - [`handler`] - The event handler
//! - [`bridge`] - Newline-delimited JSON transport over stdio

pub mod bridge;
pub mod config;
pub mod error;
pub mod handler;
pub mod notifier;
pub mod state;

pub use bridge::run_event_loop;
pub use config::PluginConfig;
pub use error::{NotifyError, PluginError};
pub use handler::{EventOutcome, FETCH_FAILED_MESSAGE, UsageReporter};
pub use notifier::{JsonLinesNotifier, Notifier};
pub use state::ReporterState;

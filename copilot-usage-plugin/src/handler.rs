//! Session event handler.
//!
//! The host delivers events one at a time and awaits each call, so the
//! reporter takes `&mut self` and needs no locking.

use copilot_usage_core::{HostEvent, QuotaReport, Toast, UsageSnapshot, usage_toast};
use copilot_usage_fetch::credentials::GITHUB_USERNAME_ENV;
use copilot_usage_fetch::{
    AuthFileCredentials, BackendKind, BillingUsageBackend, CopilotInternalBackend,
    CredentialKind, CredentialSource, Credentials, EnvCredentials, HttpClient, QuotaBackend,
};
use tracing::{debug, info, instrument, warn};

use crate::config::PluginConfig;
use crate::error::PluginError;
use crate::notifier::Notifier;
use crate::state::ReporterState;

/// Warning shown whenever the quota could not be fetched.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch quota";

/// What handling one event amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event type is not one the reporter reacts to.
    Ignored,
    /// An assistant message updated the tracked provider.
    ProviderRecorded,
    /// The session went idle but the last provider was not Copilot.
    NotCopilot,
    /// Credentials were unavailable; `warned` is true if a toast was shown.
    MissingCredentials {
        /// Whether this call showed the one-shot warning.
        warned: bool,
    },
    /// The backend failed; a warning toast was shown.
    FetchFailed,
    /// The plan has no premium quota to report.
    Unmetered,
    /// The usage toast was shown.
    Reported(UsageSnapshot),
}

/// Reports Copilot usage when a Copilot-backed session goes idle.
pub struct UsageReporter<N> {
    credentials: Box<dyn CredentialSource>,
    backend: Box<dyn QuotaBackend>,
    notifier: N,
    state: ReporterState,
}

impl<N: Notifier> UsageReporter<N> {
    /// Creates a reporter from explicit parts.
    pub fn new(
        credentials: Box<dyn CredentialSource>,
        backend: Box<dyn QuotaBackend>,
        notifier: N,
    ) -> Self {
        Self {
            credentials,
            backend,
            notifier,
            state: ReporterState::new(),
        }
    }

    /// Creates a reporter with the credential source and backend the
    /// configuration selects.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &PluginConfig, notifier: N) -> Result<Self, PluginError> {
        let http = HttpClient::with_timeout(config.timeout)?;

        let backend: Box<dyn QuotaBackend> = match config.backend {
            BackendKind::Billing => Box::new(BillingUsageBackend::with_api_base(
                http,
                config.api_base.clone(),
                config.quota,
            )),
            BackendKind::Internal => Box::new(CopilotInternalBackend::with_api_base(
                http,
                config.api_base.clone(),
            )),
        };

        let credentials: Box<dyn CredentialSource> = match config.credentials {
            CredentialKind::Env => Box::new(EnvCredentials::new(
                config.github_username.clone(),
                config.github_pat.clone(),
            )),
            CredentialKind::AuthFile => Box::new(AuthFileCredentials::new(&config.auth_file)),
        };

        debug!(
            backend = backend.id(),
            credentials = credentials.id(),
            "Reporter configured"
        );

        Ok(Self::new(credentials, backend, notifier))
    }

    /// Returns the reporter state.
    pub fn state(&self) -> &ReporterState {
        &self.state
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Consumes the reporter, returning its notifier.
    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// Handles one host event.
    #[instrument(skip_all, fields(event = event.kind()))]
    pub async fn handle_event(&mut self, event: &HostEvent) -> EventOutcome {
        match event {
            HostEvent::MessageUpdated { properties } => {
                match properties.info.assistant_provider() {
                    Some(provider_id) => {
                        self.state.record_assistant_provider(provider_id);
                        EventOutcome::ProviderRecorded
                    }
                    None => EventOutcome::Ignored,
                }
            }
            HostEvent::SessionIdle { properties } => {
                self.on_session_idle(&properties.session_id).await
            }
            HostEvent::Other => EventOutcome::Ignored,
        }
    }

    async fn on_session_idle(&mut self, session_id: &str) -> EventOutcome {
        if !self.state.copilot_active() {
            debug!(
                session_id,
                provider = self.state.last_provider_id().unwrap_or("none"),
                "Session idle on a non-Copilot provider"
            );
            return EventOutcome::NotCopilot;
        }

        let credentials = match self.usable_credentials(self.credentials.resolve()) {
            Ok(credentials) => credentials,
            Err(hint) => return self.missing_credentials(hint).await,
        };

        match self.backend.fetch(&credentials).await {
            Ok(QuotaReport::Metered(snapshot)) => {
                info!(
                    session_id,
                    used = snapshot.used,
                    quota = snapshot.quota,
                    remaining = snapshot.remaining,
                    "Copilot premium request usage"
                );
                self.notify(usage_toast(&snapshot)).await;
                EventOutcome::Reported(snapshot)
            }
            Ok(QuotaReport::Unmetered) => {
                debug!(session_id, backend = self.backend.id(), "No metered premium quota");
                EventOutcome::Unmetered
            }
            Err(e) => {
                warn!(
                    session_id,
                    backend = self.backend.id(),
                    error = %e,
                    "Failed to fetch Copilot usage"
                );
                self.notify(Toast::warning(FETCH_FAILED_MESSAGE)).await;
                EventOutcome::FetchFailed
            }
        }
    }

    /// Checks resolved credentials against the active backend, returning
    /// the warning hint when they are unusable.
    fn usable_credentials(&self, resolved: Option<Credentials>) -> Result<Credentials, String> {
        match resolved {
            Some(c) if c.username.is_none() && self.backend.requires_username() => Err(format!(
                "Missing {GITHUB_USERNAME_ENV} for premium request billing usage"
            )),
            Some(c) => Ok(c),
            None => Err(self.credentials.missing_hint()),
        }
    }

    async fn missing_credentials(&mut self, hint: String) -> EventOutcome {
        if !self.state.mark_credentials_warning_shown() {
            debug!(source = self.credentials.id(), "Credentials still missing");
            return EventOutcome::MissingCredentials { warned: false };
        }

        warn!(source = self.credentials.id(), hint = %hint, "Copilot credentials missing");
        self.notify(Toast::warning(hint)).await;
        EventOutcome::MissingCredentials { warned: true }
    }

    async fn notify(&self, toast: Toast) {
        if let Err(e) = self.notifier.show_toast(toast).await {
            warn!(error = %e, "Failed to show toast");
        }
    }
}

//! Per-process reporter state.

use copilot_usage_core::is_copilot_provider;

/// Transient state owned by the reporter for the life of the process.
///
/// Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterState {
    last_provider_id: Option<String>,
    credentials_warning_shown: bool,
}

impl ReporterState {
    /// Creates the initial state: no provider seen, no warning shown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the provider that served the latest assistant message.
    pub fn record_assistant_provider(&mut self, provider_id: &str) {
        if self.last_provider_id.as_deref() != Some(provider_id) {
            self.last_provider_id = Some(provider_id.to_string());
        }
    }

    /// Provider of the latest assistant message, if any.
    pub fn last_provider_id(&self) -> Option<&str> {
        self.last_provider_id.as_deref()
    }

    /// Whether the latest assistant message came from a Copilot provider.
    pub fn copilot_active(&self) -> bool {
        self.last_provider_id().is_some_and(is_copilot_provider)
    }

    /// Whether the missing-credentials warning was already shown.
    pub fn credentials_warning_shown(&self) -> bool {
        self.credentials_warning_shown
    }

    /// Marks the missing-credentials warning as shown.
    ///
    /// Returns `true` only the first time.
    pub fn mark_credentials_warning_shown(&mut self) -> bool {
        !std::mem::replace(&mut self.credentials_warning_shown, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ReporterState::new();
        assert_eq!(state.last_provider_id(), None);
        assert!(!state.copilot_active());
        assert!(!state.credentials_warning_shown());
    }

    #[test]
    fn test_latest_provider_wins() {
        let mut state = ReporterState::new();
        state.record_assistant_provider("github-copilot");
        assert!(state.copilot_active());

        state.record_assistant_provider("anthropic");
        assert!(!state.copilot_active());
        assert_eq!(state.last_provider_id(), Some("anthropic"));
    }

    #[test]
    fn test_warning_flag_is_one_shot() {
        let mut state = ReporterState::new();
        assert!(state.mark_credentials_warning_shown());
        assert!(!state.mark_credentials_warning_shown());
        assert!(state.credentials_warning_shown());
    }
}

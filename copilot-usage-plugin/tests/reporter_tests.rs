//! End-to-end tests: configuration to toast, against a mock GitHub API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use copilot_usage_core::{HostEvent, Toast, ToastVariant};
use copilot_usage_fetch::{BackendKind, CredentialKind};
use copilot_usage_plugin::{
    EventOutcome, FETCH_FAILED_MESSAGE, Notifier, NotifyError, PluginConfig, UsageReporter,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingNotifier {
    fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn show_toast(&self, toast: Toast) -> Result<(), NotifyError> {
        self.toasts.lock().unwrap().push(toast);
        Ok(())
    }
}

fn billing_config(server: &MockServer) -> PluginConfig {
    PluginConfig {
        backend: BackendKind::Billing,
        credentials: CredentialKind::Env,
        quota: 300,
        api_base: server.uri(),
        timeout: Duration::from_secs(5),
        github_username: Some("octocat".to_string()),
        github_pat: Some("ghp_test".to_string()),
        ..PluginConfig::default()
    }
}

async fn copilot_turn(reporter: &mut UsageReporter<RecordingNotifier>) -> EventOutcome {
    reporter
        .handle_event(&HostEvent::assistant_message("github-copilot", "gpt-4.1"))
        .await;
    reporter.handle_event(&HostEvent::session_idle("ses_1")).await
}

#[tokio::test]
async fn test_billing_usage_toast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/settings/billing/premium_request/usage"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "usageItems": [
                {"product": "Copilot", "sku": "Copilot Premium Request", "grossQuantity": 90.0},
                {"product": "Copilot", "sku": "Copilot Premium Request", "grossQuantity": 60.0}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&billing_config(&server), notifier.clone()).unwrap();

    let outcome = copilot_turn(&mut reporter).await;
    assert!(matches!(outcome, EventOutcome::Reported(s) if s.used == 150.0));

    let toasts = notifier.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Copilot Premium Requests");
    assert_eq!(toasts[0].variant, ToastVariant::Info);
    assert_eq!(
        toasts[0].message,
        format!("{}{} 50%\n150/300 • 150 left", "█".repeat(10), "░".repeat(10))
    );
}

#[tokio::test]
async fn test_billing_forbidden_warns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&billing_config(&server), notifier.clone()).unwrap();

    assert_eq!(copilot_turn(&mut reporter).await, EventOutcome::FetchFailed);

    let toasts = notifier.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Copilot Usage");
    assert_eq!(toasts[0].message, FETCH_FAILED_MESSAGE);
    assert_eq!(toasts[0].variant, ToastVariant::Warning);
}

#[tokio::test]
async fn test_non_copilot_session_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&billing_config(&server), notifier.clone()).unwrap();

    reporter
        .handle_event(&HostEvent::assistant_message("openai", "gpt-4o"))
        .await;
    let outcome = reporter.handle_event(&HostEvent::session_idle("ses_1")).await;

    assert_eq!(outcome, EventOutcome::NotCopilot);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_missing_env_credentials_warn_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = PluginConfig {
        github_pat: None,
        ..billing_config(&server)
    };
    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&config, notifier.clone()).unwrap();

    copilot_turn(&mut reporter).await;
    copilot_turn(&mut reporter).await;

    let toasts = notifier.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Missing GITHUB_USERNAME or GITHUB_PAT");
    assert!(reporter.state().credentials_warning_shown());
}

#[tokio::test]
async fn test_internal_backend_with_auth_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/copilot_internal/user"))
        .and(header("authorization", "Bearer gho_stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "copilot_plan": "individual",
            "quota_snapshots": {
                "premium_interactions": {"entitlement": 300, "remaining": 15, "unlimited": false}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let auth_file = dir.path().join("auth.json");
    std::fs::write(
        &auth_file,
        r#"{"github-copilot": {"type": "oauth", "refresh": "gho_stored"}}"#,
    )
    .unwrap();

    let config = PluginConfig {
        backend: BackendKind::Internal,
        credentials: CredentialKind::AuthFile,
        auth_file,
        api_base: server.uri(),
        ..PluginConfig::default()
    };
    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&config, notifier.clone()).unwrap();

    let outcome = copilot_turn(&mut reporter).await;
    assert!(matches!(outcome, EventOutcome::Reported(s) if s.used == 285.0));

    let toasts = notifier.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].variant, ToastVariant::Error);
    assert!(toasts[0].message.ends_with(" 95%\n285/300 • 15 left"));
}

#[tokio::test]
async fn test_internal_unlimited_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/copilot_internal/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "quota_snapshots": {"premium_interactions": {"unlimited": true}}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let auth_file = dir.path().join("auth.json");
    std::fs::write(&auth_file, r#"{"github-copilot": {"refresh": "gho_stored"}}"#).unwrap();

    let config = PluginConfig {
        backend: BackendKind::Internal,
        credentials: CredentialKind::AuthFile,
        auth_file,
        api_base: server.uri(),
        ..PluginConfig::default()
    };
    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&config, notifier.clone()).unwrap();

    assert_eq!(copilot_turn(&mut reporter).await, EventOutcome::Unmetered);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_billing_with_auth_file_needs_username() {
    let dir = tempfile::tempdir().unwrap();
    let auth_file = dir.path().join("auth.json");
    std::fs::write(&auth_file, r#"{"github-copilot": {"refresh": "gho_stored"}}"#).unwrap();

    let config = PluginConfig {
        backend: BackendKind::Billing,
        credentials: CredentialKind::AuthFile,
        auth_file,
        api_base: "http://127.0.0.1:9".to_string(),
        ..PluginConfig::default()
    };
    let notifier = RecordingNotifier::default();
    let mut reporter = UsageReporter::from_config(&config, notifier.clone()).unwrap();

    assert_eq!(
        copilot_turn(&mut reporter).await,
        EventOutcome::MissingCredentials { warned: true }
    );
    assert_eq!(
        notifier.toasts()[0].message,
        "Missing GITHUB_USERNAME for premium request billing usage"
    );
}

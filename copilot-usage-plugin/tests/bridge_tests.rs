//! Tests for the JSON-lines event loop.

use copilot_usage_core::{ToastRequest, ToastVariant};
use copilot_usage_fetch::{BackendKind, CredentialKind};
use copilot_usage_plugin::{JsonLinesNotifier, PluginConfig, UsageReporter, run_event_loop};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_event_stream_to_toast_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/settings/billing/premium_request/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "usageItems": [{"product": "Copilot", "sku": "Copilot Premium Request", "grossQuantity": 240.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = PluginConfig {
        backend: BackendKind::Billing,
        credentials: CredentialKind::Env,
        api_base: server.uri(),
        github_username: Some("octocat".to_string()),
        github_pat: Some("ghp_test".to_string()),
        ..PluginConfig::default()
    };
    let mut reporter = UsageReporter::from_config(&config, JsonLinesNotifier::new(Vec::new())).unwrap();

    let input = concat!(
        r#"{"type":"message.updated","properties":{"info":{"role":"user","id":"msg_1"}}}"#,
        "\n",
        r#"{"type":"message.updated","properties":{"info":{"role":"assistant","providerID":"github-copilot","modelID":"gpt-4.1"}}}"#,
        "\n\n",
        "not json\n",
        r#"{"type":"session.updated","properties":{}}"#,
        "\n",
        r#"{"type":"session.idle","properties":{"sessionID":"ses_1"}}"#,
        "\n",
    );

    let handled = run_event_loop(input.as_bytes(), &mut reporter).await.unwrap();
    assert_eq!(handled, 4);

    let output = String::from_utf8(reporter.into_notifier().into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);

    let request: ToastRequest = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(request.body.title, "Copilot Premium Requests");
    assert_eq!(request.body.variant, ToastVariant::Warning);
    assert_eq!(request.body.duration, 8000);
    assert!(request.body.message.ends_with(" 80%\n240/300 • 60 left"));
}

#[tokio::test]
async fn test_invalid_utf8_line_is_skipped() {
    let mut reporter =
        UsageReporter::from_config(&PluginConfig::default(), JsonLinesNotifier::new(Vec::new())).unwrap();

    let mut input = b"{\"type\":\"x\",\"p\":\"\xff\xfe\"}\n".to_vec();
    input.extend_from_slice(
        br#"{"type":"message.updated","properties":{"info":{"role":"assistant","providerID":"github-copilot","modelID":"gpt-4.1"}}}"#,
    );
    input.push(b'\n');

    let handled = run_event_loop(input.as_slice(), &mut reporter).await.unwrap();
    assert_eq!(handled, 1);
    assert_eq!(reporter.state().last_provider_id(), Some("github-copilot"));
}

#[tokio::test]
async fn test_last_line_without_newline() {
    let mut reporter =
        UsageReporter::from_config(&PluginConfig::default(), JsonLinesNotifier::new(Vec::new())).unwrap();

    let input = r#"{"type":"message.updated","properties":{"info":{"role":"assistant","providerID":"openai","modelID":"gpt-4o"}}}"#;

    let handled = run_event_loop(input.as_bytes(), &mut reporter).await.unwrap();
    assert_eq!(handled, 1);
    assert_eq!(reporter.state().last_provider_id(), Some("openai"));
}

#[tokio::test]
async fn test_empty_stream() {
    let mut reporter =
        UsageReporter::from_config(&PluginConfig::default(), JsonLinesNotifier::new(Vec::new())).unwrap();

    let handled = run_event_loop(&b""[..], &mut reporter).await.unwrap();
    assert_eq!(handled, 0);
    assert!(reporter.into_notifier().into_inner().is_empty());
}

use council::{
    council::Council,
    errors::CallError,
    models::{message::Message, outcome::CallOutcome},
    providers::{
        configs::{OpenRouterProviderConfig, CHAT_COMPLETIONS_PATH},
        openrouter::OpenRouterProvider,
        retry::RetryPolicy,
    },
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn council_for(host: String, api_key: Option<&str>) -> Council<OpenRouterProvider> {
    let config = OpenRouterProviderConfig::new(host, api_key.map(String::from)).with_retry(
        RetryPolicy {
            max_attempts: 3,
            rate_limit_base_delay: Duration::from_millis(10),
            transport_base_delay: Duration::from_millis(10),
        },
    );
    let provider = OpenRouterProvider::new(config).expect("provider should build");
    Council::new(Arc::new(provider)).with_timeout(Duration::from_secs(5))
}

async fn mount_model(server: &MockServer, model: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(CHAT_COMPLETIONS_PATH))
        .and(body_partial_json(json!({ "model": model })))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn answer(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

#[tokio::test]
async fn test_dispatch_over_http_mixes_outcomes() {
    let server = MockServer::start().await;
    mount_model(&server, "vendor/good", answer("Paris"), 1).await;
    mount_model(&server, "vendor/missing", ResponseTemplate::new(404), 1).await;
    mount_model(
        &server,
        "vendor/empty",
        ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
        1,
    )
    .await;
    mount_model(&server, "vendor/busy", ResponseTemplate::new(429), 3).await;

    let council = council_for(server.uri(), Some("test_api_key"));
    let members: Vec<String> = ["vendor/good", "vendor/missing", "vendor/empty", "vendor/busy"]
        .iter()
        .map(|m| m.to_string())
        .collect();

    let result = council
        .dispatch(&members, &[Message::user("Capital of France?")])
        .await;

    assert_eq!(result.models().collect::<Vec<_>>(), members);

    let kinds: Vec<Option<&str>> = result
        .iter()
        .map(|entry| entry.outcome.reason().map(CallError::kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some("upstream"),
            Some("invalid_response_shape"),
            Some("rate_limited")
        ]
    );
    assert_eq!(
        result.get("vendor/good").and_then(CallOutcome::text).as_deref(),
        Some("Paris")
    );
}

#[tokio::test]
async fn test_dispatch_without_credential_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let council = council_for(server.uri(), None);
    let members = vec!["vendor/a".to_string(), "vendor/b".to_string()];

    let result = council.dispatch(&members, &[Message::user("hi")]).await;

    assert_eq!(result.len(), 2);
    for entry in &result {
        assert_eq!(
            entry.outcome,
            CallOutcome::failure(CallError::MissingCredential)
        );
    }
}

#[tokio::test]
async fn test_deliberate_over_http() {
    let server = MockServer::start().await;
    mount_model(&server, "vendor/a", answer("Paris"), 1).await;
    mount_model(&server, "vendor/b", answer("It is Paris."), 1).await;
    mount_model(&server, "vendor/chair", answer("Paris is the capital of France."), 1).await;

    let council = council_for(server.uri(), Some("test_api_key"));
    let members = vec!["vendor/a".to_string(), "vendor/b".to_string()];

    let deliberation = council
        .deliberate(&members, "vendor/chair", "Capital of France?")
        .await;

    assert_eq!(deliberation.responses.successes().count(), 2);
    assert_eq!(
        deliberation.synthesis.text().as_deref(),
        Some("Paris is the capital of France.")
    );
}

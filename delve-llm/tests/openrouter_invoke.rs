use delve_llm::{OpenRouterClient, ReasoningEffort, ReasoningModel};
use delve_core::DelveError;
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> OpenRouterClient {
    OpenRouterClient::builder()
        .base_url(server.url(""))
        .api_key("or-test-key")
        .model("deepseek/deepseek-r1:free")
        .build()
        .unwrap()
}

#[tokio::test]
async fn generate_concatenates_reasoning_and_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("authorization", "Bearer or-test-key")
            .json_body_partial(
                r#"{
                    "model": "deepseek/deepseek-r1:free",
                    "messages": [{"role": "user", "content": "what is rust?"}],
                    "reasoning": {"effort": "low"}
                }"#,
            );
        then.status(200).json_body(json!({
            "choices": [{
                "message": {
                    "reasoning": "Let me think about this.",
                    "content": "Rust is a systems language."
                }
            }]
        }));
    });

    let client = client_for(&server);
    let output = client
        .generate("what is rust?", ReasoningEffort::Low)
        .await
        .unwrap();

    assert_eq!(
        output,
        "Let me think about this.\nRust is a systems language."
    );
    mock.assert();
}

#[tokio::test]
async fn generate_passes_requested_effort() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .json_body_partial(r#"{"reasoning": {"effort": "high"}}"#);
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "ok"}}]
        }));
    });

    let client = client_for(&server);
    let output = client.generate("q", ReasoningEffort::High).await.unwrap();
    assert_eq!(output, "ok");
    mock.assert();
}

#[tokio::test]
async fn generate_returns_content_when_no_trace_is_exposed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "plain answer"}}]
        }));
    });

    let client = client_for(&server);
    let output = client.generate("q", ReasoningEffort::Low).await.unwrap();
    assert_eq!(output, "plain answer");
}

#[tokio::test]
async fn generate_carries_the_error_body_on_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(429).body("rate limit exceeded");
    });

    let client = client_for(&server);
    let err = client
        .generate("q", ReasoningEffort::Low)
        .await
        .unwrap_err();
    match err {
        DelveError::LlmProvider(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("rate limit exceeded"));
        }
        other => panic!("expected provider failure, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_rejects_empty_choice_lists() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    });

    let client = client_for(&server);
    let err = client
        .generate("q", ReasoningEffort::Low)
        .await
        .unwrap_err();
    assert!(matches!(err, DelveError::LlmProvider(_)));
}

#[test]
fn builder_requires_an_api_key() {
    let err = OpenRouterClient::builder().build().unwrap_err();
    assert!(matches!(err, DelveError::InvalidConfig(_)));
}

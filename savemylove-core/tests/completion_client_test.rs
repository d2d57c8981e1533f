mod common;

use common::{
    COMPLETIONS_PATH, TEST_KEY, completion_body, mount_json, mount_stream, sent_body, sse_body,
    test_config,
};
use futures::StreamExt;
use savemylove_core::llm::{CompletionClient, LLMError, UserPrompt};
use savemylove_core::streaming::AccumulatingSink;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn non_streaming_call_sends_service_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .and(header("content-type", "application/json"))
        .and(header("HTTP-Referer", "https://savemy.love"))
        .and(header("X-Title", "SaveMyLove"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let text = client
        .analyze(UserPrompt::text("hello"), None, None)
        .await
        .unwrap();
    assert_eq!(text, "Hi there");

    let body = sent_body(&server).await;
    assert_eq!(body["stream"], false);
    assert_eq!(body["model"], "anthropic/claude-3.7-sonnet");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hello");
}

#[tokio::test]
async fn http_error_becomes_transport_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let mut sink = AccumulatingSink::new();
    let err = client
        .analyze(UserPrompt::text("hello"), None, Some(&mut sink))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    match err {
        LLMError::Transport { message, .. } => {
            assert!(message.starts_with("OpenRouter API error"));
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(sink.result().is_empty());
}

#[tokio::test]
async fn response_without_choices_is_invalid() {
    let server = MockServer::start().await;
    mount_json(&server, serde_json::json!({"choices": []})).await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let err = client
        .analyze(UserPrompt::text("hello"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}

#[tokio::test]
async fn supplying_a_sink_requests_a_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["Hel", "lo"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let mut sink = AccumulatingSink::new();
    let text = client
        .analyze(UserPrompt::text("hello"), None, Some(&mut sink))
        .await
        .unwrap();

    assert_eq!(text, "Hello");
    assert_eq!(sink.result().as_str(), "Hello");
}

#[tokio::test]
async fn image_prompt_uses_image_model_and_content_parts() {
    let server = MockServer::start().await;
    mount_json(&server, completion_body("A sunset")).await;

    let mut config = test_config(&server);
    config.provider.image_model = "vision/test-model".to_string();
    let client = CompletionClient::new(&config).unwrap();
    client
        .analyze(
            UserPrompt::text("What is this?").with_image("https://img.example/a.png"),
            None,
            None,
        )
        .await
        .unwrap();

    let body = sent_body(&server).await;
    assert_eq!(body["model"], "vision/test-model");
    let content = &body["messages"][0]["content"];
    assert_eq!(content[0]["type"], "text");
    assert_eq!(content[0]["text"], "What is this?");
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(content[1]["image_url"]["url"], "https://img.example/a.png");
}

#[tokio::test]
async fn explicit_model_overrides_configuration() {
    let server = MockServer::start().await;
    mount_json(&server, completion_body("ok")).await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    client
        .analyze(UserPrompt::text("hello"), Some("openai/gpt-4o"), None)
        .await
        .unwrap();
    assert_eq!(sent_body(&server).await["model"], "openai/gpt-4o");
}

#[tokio::test]
async fn pull_stream_yields_deltas_in_order() {
    let server = MockServer::start().await;
    mount_stream(&server, sse_body(&["你", "好", "!"])).await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let request = client.build_request(UserPrompt::text("hi"), None, true);
    let deltas: Vec<String> = client.stream_deltas(&request).await.unwrap().collect().await;
    assert_eq!(deltas, vec!["你", "好", "!"]);
}

#[tokio::test]
async fn pull_stream_reports_request_errors_up_front() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server)).unwrap();
    let request = client.build_request(UserPrompt::text("hi"), None, true);
    let err = match client.stream_deltas(&request).await {
        Ok(_) => panic!("expected the request to be rejected"),
        Err(err) => err,
    };
    assert_eq!(err.status(), Some(401));
}

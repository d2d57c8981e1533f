//! Shared helpers for tests that run against a mock completion endpoint.

#![allow(dead_code)]

use savemylove_core::AppConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "sk-or-test";
pub const COMPLETIONS_PATH: &str = "/chat/completions";

/// Configuration pointing at `server` with retries that never sleep
pub fn test_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.base_url = server.uri();
    config.provider.api_key = Some(TEST_KEY.to_string());
    config.streaming.delivery_backoff_ms = 0;
    config
}

pub fn delta_line(content: &str) -> String {
    let chunk = json!({
        "id": "gen-1",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": content}}]
    });
    format!("data: {chunk}\n\n")
}

/// Event-stream body carrying `deltas` followed by the end marker
pub fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::from(": OPENROUTER PROCESSING\n\n");
    for delta in deltas {
        body.push_str(&delta_line(delta));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

pub async fn mount_stream(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

pub async fn mount_json(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// JSON body of the only request the server received
pub async fn sent_body(server: &MockServer) -> serde_json::Value {
    let requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].body_json().expect("request body is JSON")
}

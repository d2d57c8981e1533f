mod common;

use common::{completion_body, mount_json, mount_stream, sent_body, sse_body, test_config};
use savemylove_core::streaming::AccumulatingSink;
use savemylove_core::{
    ChatAnalysis, CommunicationGuidance, Consultant, Language, LLMError, NameCompatibility,
};
use wiremock::MockServer;

#[tokio::test]
async fn name_compatibility_streams_interpolated_report() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        sse_body(&[
            "# Alice & Bob 姓名缘分分析\n",
            "## 匹配度\n|维度|分数|\n|五行|88|\n",
        ]),
    )
    .await;

    let consultant = Consultant::from_config(&test_config(&server)).unwrap();
    let input = NameCompatibility {
        name1: "Alice".into(),
        name2: "Bob".into(),
        language: Language::English,
    };
    let mut sink = AccumulatingSink::new();
    let text = consultant
        .name_compatibility(&input, Some(&mut sink))
        .await
        .unwrap();

    let body = sent_body(&server).await;
    assert_eq!(body["stream"], true);
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("# Alice & Bob"));
    assert!(prompt.contains("English"));
    assert!(!prompt.contains("{name1}"));
    assert!(!prompt.contains("{name2}"));
    assert!(!prompt.contains("{lang}"));

    assert!(!text.is_empty());
    let display = sink.display().content();
    assert!(display.starts_with("\n# Alice & Bob"));
    assert!(display.contains("| :---: | :---: |"));
}

#[tokio::test]
async fn chat_analysis_uses_unlimited_model() {
    let server = MockServer::start().await;
    mount_json(&server, completion_body("## 沟通模式\n- 频繁")).await;

    let mut config = test_config(&server);
    config.provider.unlimited_model = "long/context-model".to_string();
    let consultant = Consultant::from_config(&config).unwrap();
    let input = ChatAnalysis {
        chat_history: "A: 在吗\nB: 在".into(),
        screenshot_url: None,
    };
    let text = consultant.chat_analysis(&input, None).await.unwrap();

    assert_eq!(text, "## 沟通模式\n- 频繁");
    let body = sent_body(&server).await;
    assert_eq!(body["model"], "long/context-model");
    assert_eq!(body["stream"], false);
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("A: 在吗"));
}

#[tokio::test]
async fn communication_guidance_carries_language_tag() {
    let server = MockServer::start().await;
    mount_json(&server, completion_body("ok")).await;

    let consultant = Consultant::from_config(&test_config(&server)).unwrap();
    let input = CommunicationGuidance {
        context: "We argue about chores".into(),
        language: Some(Language::English),
    };
    consultant.communication_guidance(&input, None).await.unwrap();

    let body = sent_body(&server).await;
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.starts_with("[Language: English]\n"));
    assert!(prompt.contains("We argue about chores"));
}

#[tokio::test]
async fn missing_api_key_is_reported_at_construction() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.provider.api_key = None;

    let err = Consultant::from_config(&config).unwrap_err();
    assert!(matches!(err, LLMError::Configuration(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// File: tests/anthropic_client.rs
use chrono::{Duration, NaiveDate};
use mockito::{Matcher, Server};
use serde_json::json;
use serial_test::serial;
use std::env;
use taskvoice::config::{API_KEY_ENV, Config};
use taskvoice::extract::{PrimaryExtractor, TranscriptParser};
use taskvoice::llm::{AnthropicClient, LanguageModel, LlmError};
use taskvoice::model::{Priority, TaskStatus};

fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn text_reply(text: &str) -> String {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
    .to_string()
}

#[tokio::test]
async fn test_complete_sends_messages_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "claude-test",
                "max_tokens": 256,
            })),
            Matcher::Regex(r#""role":"user""#.to_string()),
            Matcher::Regex("hello model".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply("hi there"))
        .create_async()
        .await;

    let client = AnthropicClient::new(Some("test-key".to_string()))
        .with_api_url(&format!("{}/", server.url()))
        .with_model("claude-test")
        .with_max_tokens(256);

    let reply = client.complete("hello model").await.unwrap();
    assert_eq!(reply, "hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = AnthropicClient::new(Some("k".to_string())).with_api_url(&server.url());
    match client.complete("x").await {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reply_without_text_block_is_empty() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "content": [] }).to_string())
        .create_async()
        .await;

    let client = AnthropicClient::new(Some("k".to_string())).with_api_url(&server.url());
    assert!(matches!(client.complete("x").await, Err(LlmError::EmptyReply)));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    for key in [None, Some("   ".to_string())] {
        let client = AnthropicClient::new(key).with_api_url(&server.url());
        assert!(!client.has_api_key());
        assert!(matches!(client.complete("x").await, Err(LlmError::MissingApiKey)));
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_parser_uses_model_reply() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply(
            r#"{"title": "Finish quarterly report", "priority": "High", "dueDate": "2025-01-16", "status": "To Do"}"#,
        ))
        .create_async()
        .await;

    let client = AnthropicClient::new(Some("k".to_string())).with_api_url(&server.url());
    let parser = TranscriptParser::new(PrimaryExtractor::new(client));
    let parsed = parser
        .parse_at("add task to finish urgent report by tomorrow", reference_day())
        .await;

    assert_eq!(parsed.title, "Finish quarterly report");
    assert_eq!(parsed.priority, Priority::High);
    assert_eq!(parsed.due_date, NaiveDate::from_ymd_opt(2025, 1, 16));
    assert_eq!(parsed.status, TaskStatus::ToDo);
}

#[tokio::test]
async fn test_parser_falls_back_on_server_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = AnthropicClient::new(Some("k".to_string())).with_api_url(&server.url());
    let parser = TranscriptParser::new(PrimaryExtractor::new(client));
    let parsed = parser
        .parse_at("add task to finish urgent report by tomorrow", reference_day())
        .await;

    assert_eq!(parsed.title, "Finish report");
    assert_eq!(parsed.priority, Priority::High);
    assert_eq!(parsed.due_date, Some(reference_day() + Duration::days(1)));
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_parser_from_config_targets_configured_endpoint() {
    unsafe {
        env::remove_var(API_KEY_ENV);
    }
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "from-config")
        .match_body(Matcher::PartialJson(json!({ "model": "claude-configured" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply(r#"{"title": "Configured", "priority": "Low"}"#))
        .create_async()
        .await;

    let config = Config {
        api_key: Some("from-config".to_string()),
        model: "claude-configured".to_string(),
        api_url: server.url(),
        ..Config::default()
    };
    let parsed = TranscriptParser::from_config(&config)
        .parse_at("whatever", reference_day())
        .await;

    assert_eq!(parsed.title, "Configured");
    assert_eq!(parsed.priority, Priority::Low);
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_use_llm_false_never_calls_model() {
    unsafe {
        env::set_var(API_KEY_ENV, "env-key");
    }
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    let config = Config {
        api_url: server.url(),
        use_llm: false,
        ..Config::default()
    };
    let parsed = TranscriptParser::from_config(&config)
        .parse_at("remind me to call mom tomorrow", reference_day())
        .await;

    unsafe {
        env::remove_var(API_KEY_ENV);
    }
    assert_eq!(parsed.title, "Call mom");
    mock.assert_async().await;
}

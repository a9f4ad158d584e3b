// End-to-end tests: conversation tracker talking to a mocked Gemini API

use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use tunechat::config::Config;
use tunechat::providers::{create_provider, GeminiProvider};
use tunechat::{ConversationTracker, GatewayError, TextGenerator};

fn reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_tracker_replays_history_over_http() -> Result<()> {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-1\.5-flash:generateContent".into()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "user: What is 2+2?" }] }]
        })))
        .with_status(200)
        .with_body(reply("4"))
        .expect(1)
        .create_async()
        .await;

    let second = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-1\.5-flash:generateContent".into()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "parts": [{ "text": "user: What is 2+2?\nassistant: 4\nuser: And 3+3?" }] }]
        })))
        .with_status(200)
        .with_body(reply("6"))
        .expect(1)
        .create_async()
        .await;

    let provider = GeminiProvider::new("test-key".to_string())?.with_base_url(server.url());
    let mut tracker = ConversationTracker::new(Box::new(provider));

    assert_eq!(tracker.send("What is 2+2?").await?, "4");
    assert_eq!(tracker.send("And 3+3?").await?, "6");
    assert_eq!(tracker.last_assistant_message(), "6");

    first.assert_async().await;
    second.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_auth_failure_propagates_from_send() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"status":"INVALID_ARGUMENT","message":"API key not valid"}}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new("bad-key".to_string())?.with_base_url(server.url());
    let mut tracker = ConversationTracker::new(Box::new(provider));

    let err = tracker.send("hello").await.unwrap_err();
    assert!(matches!(err, GatewayError::Status { .. }));
    assert!(err.to_string().contains("API key not valid"));
    assert_eq!(tracker.history().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_provider_from_config_uses_background_and_model() -> Result<()> {
    let mut background = NamedTempFile::new()?;
    writeln!(background, "You are a math tutor.")?;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-2\.0-flash:generateContent".into()))
        .match_header("x-goog-api-key", "config-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "parts": [{ "text": "System: You are a math tutor.\nUser: hi" }] }]
        })))
        .with_status(200)
        .with_body(reply("Hello!"))
        .create_async()
        .await;

    let mut config = Config::with_api_key("config-key");
    config.model = "gemini-2.0-flash".to_string();
    config.base_url = server.url();
    config.background_file = background.path().to_path_buf();

    let provider = create_provider(&config)?;
    assert_eq!(provider.generate("hi").await?, "Hello!");

    mock.assert_async().await;
    Ok(())
}

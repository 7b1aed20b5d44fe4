//! Integration tests for [`webhook_client::WebhookClient`] against a mockito server.
//!
//! Covers: request framing (all eight fields, JSON content type), reply extraction, and the
//! fallback on non-2xx status, malformed body, missing `reply`, and connection failure.

use bestar_core::{DataUri, Envelope, Identity};
use mockito::Matcher;
use serde_json::json;
use webhook_client::{ChatTransport, TransportError, WebhookClient, DEFAULT_FALLBACK_REPLY};

fn ahmed() -> Identity {
    Identity {
        display_name: "Ahmed Mohamed".to_string(),
        phone_number: "01012345678".to_string(),
    }
}

/// **Test: a text envelope is posted with every field and the reply is returned.**
#[tokio::test]
async fn test_text_send_returns_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "source": "webchat",
            "session_id": "web_01012345678",
            "user_phone": "01012345678",
            "user_name": "Ahmed Mohamed",
            "message_type": "text",
            "message_text": "ما هو سعر التذكرة؟",
            "image_base64": "",
            "audio_base64": ""
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"reply": "100 جنيه"}"#)
        .create_async()
        .await;

    let client = WebhookClient::new(format!("{}/webhook/chat", server.url()));
    let envelope = Envelope::text(Some(&ahmed()), "ما هو سعر التذكرة؟");
    let reply = client.send(&envelope).await;

    assert_eq!(reply.reply_text, "100 جنيه");
    mock.assert_async().await;
}

/// **Test: image envelopes carry the caption and the data URI.**
#[tokio::test]
async fn test_image_send_frames_payload() {
    let mut server = mockito::Server::new_async().await;
    let uri = DataUri::encode("image/png", b"png-bytes");
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "message_type": "image",
            "message_text": "customer sent a photo",
            "image_base64": uri.as_str(),
            "audio_base64": ""
        })))
        .with_status(200)
        .with_body(r#"{"reply": "received"}"#)
        .create_async()
        .await;

    let client = WebhookClient::new(server.url());
    let envelope = Envelope::image(Some(&ahmed()), "customer sent a photo", uri.clone());
    assert_eq!(client.send(&envelope).await.reply_text, "received");
    mock.assert_async().await;
}

/// **Test: non-2xx status resolves to the fallback reply; try_send reports the status.**
#[tokio::test]
async fn test_server_error_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(500)
        .with_body(r#"{"reply": "should not be used"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = WebhookClient::new(server.url());
    let envelope = Envelope::text(Some(&ahmed()), "hi");

    assert_eq!(client.send(&envelope).await.reply_text, DEFAULT_FALLBACK_REPLY);
    assert!(matches!(
        client.try_send(&envelope).await,
        Err(TransportError::Status { status: 500, .. })
    ));
}

/// **Test: bodies that are not JSON, lack `reply`, or carry a blank reply fall back.**
#[tokio::test]
async fn test_malformed_replies_use_fallback() {
    for body in ["not json", r#"{"message": "hi"}"#, r#"{"reply": 42}"#, r#"{"reply": "  "}"#] {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = WebhookClient::new(server.url()).with_fallback_reply("fallback");
        let reply = client.send(&Envelope::text(Some(&ahmed()), "hi")).await;
        assert_eq!(reply.reply_text, "fallback", "body {body:?}");
    }
}

/// **Test: a refused connection resolves to the fallback reply instead of an error.**
#[tokio::test]
async fn test_network_error_uses_fallback() {
    let client = WebhookClient::new("http://127.0.0.1:1/webhook");
    let envelope = Envelope::text(None, "hi");

    assert!(matches!(
        client.try_send(&envelope).await,
        Err(TransportError::Network(_))
    ));
    assert_eq!(client.send(&envelope).await.reply_text, DEFAULT_FALLBACK_REPLY);
}

//! Core types: identity, chat message, webhook envelope and reply, data URI.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel tag carried by every envelope.
pub const WEBCHAT_SOURCE: &str = "webchat";

/// Session id used when no phone number is known.
pub const ANONYMOUS_SESSION_ID: &str = "web_anon";

/// Locally registered visitor identity. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
    pub phone_number: String,
}

impl Identity {
    /// Webhook session id derived from the phone number.
    pub fn session_id(&self) -> String {
        session_id_for(Some(&self.phone_number))
    }
}

/// `"web_" + phone`, or [`ANONYMOUS_SESSION_ID`] when the phone is absent or empty.
pub fn session_id_for(phone: Option<&str>) -> String {
    match phone {
        Some(p) if !p.is_empty() => format!("web_{}", p),
        _ => ANONYMOUS_SESSION_ID.to_string(),
    }
}

/// Author of a message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single entry in the conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Stands in for binary content (image/audio) that is not rendered in the log.
    pub is_media_placeholder: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: String, role: Role, text: impl Into<String>, is_media_placeholder: bool) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            is_media_placeholder,
            created_at: Utc::now(),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Kind of user action carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Audio => "audio",
        }
    }
}

/// Uniform outbound webhook body. Every field is always serialized, empty or not, so the remote
/// contract is identical across message kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub source: String,
    pub session_id: String,
    pub user_phone: String,
    pub user_name: String,
    pub message_type: MessageKind,
    pub message_text: String,
    pub image_base64: String,
    pub audio_base64: String,
}

impl Envelope {
    fn base(identity: Option<&Identity>, message_type: MessageKind) -> Self {
        let (phone, name) = identity
            .map(|i| (i.phone_number.clone(), i.display_name.clone()))
            .unwrap_or_default();
        Self {
            source: WEBCHAT_SOURCE.to_string(),
            session_id: session_id_for(Some(&phone)),
            user_phone: phone,
            user_name: name,
            message_type,
            message_text: String::new(),
            image_base64: String::new(),
            audio_base64: String::new(),
        }
    }

    pub fn text(identity: Option<&Identity>, text: impl Into<String>) -> Self {
        Self {
            message_text: text.into(),
            ..Self::base(identity, MessageKind::Text)
        }
    }

    /// Image envelope; `caption` goes in `message_text`.
    pub fn image(identity: Option<&Identity>, caption: impl Into<String>, image: DataUri) -> Self {
        Self {
            message_text: caption.into(),
            image_base64: image.into_string(),
            ..Self::base(identity, MessageKind::Image)
        }
    }

    /// Audio envelope; `message_text` stays empty.
    pub fn audio(identity: Option<&Identity>, audio: DataUri) -> Self {
        Self {
            audio_base64: audio.into_string(),
            ..Self::base(identity, MessageKind::Audio)
        }
    }
}

/// Reply text resolved by the transport (webhook reply or fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub reply_text: String,
}

impl Reply {
    pub fn new(reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
        }
    }
}

/// `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri(String);

impl DataUri {
    /// Encodes `bytes` with standard base64 under the given mime type.
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{};base64,{}", mime, payload))
    }

    /// Mime type between `data:` and `;base64`.
    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ahmed() -> Identity {
        Identity {
            display_name: "Ahmed Mohamed".to_string(),
            phone_number: "01012345678".to_string(),
        }
    }

    #[test]
    fn test_session_id_from_phone() {
        assert_eq!(ahmed().session_id(), "web_01012345678");
        assert_eq!(session_id_for(None), "web_anon");
        assert_eq!(session_id_for(Some("")), "web_anon");
    }

    #[test]
    fn test_text_envelope_serializes_every_field() {
        let envelope = Envelope::text(Some(&ahmed()), "hello");
        let value = serde_json::to_value(&envelope).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["source"], "webchat");
        assert_eq!(obj["session_id"], "web_01012345678");
        assert_eq!(obj["user_phone"], "01012345678");
        assert_eq!(obj["user_name"], "Ahmed Mohamed");
        assert_eq!(obj["message_type"], "text");
        assert_eq!(obj["message_text"], "hello");
        assert_eq!(obj["image_base64"], "");
        assert_eq!(obj["audio_base64"], "");
    }

    #[test]
    fn test_anonymous_envelope() {
        let envelope = Envelope::text(None, "hi");
        assert_eq!(envelope.session_id, "web_anon");
        assert!(envelope.user_phone.is_empty());
        assert!(envelope.user_name.is_empty());
    }

    #[test]
    fn test_media_envelopes_keep_caption_asymmetry() {
        let image = Envelope::image(Some(&ahmed()), "customer sent a photo", DataUri::encode("image/png", b"png"));
        assert_eq!(image.message_type, MessageKind::Image);
        assert_eq!(image.message_text, "customer sent a photo");
        assert!(image.image_base64.starts_with("data:image/png;base64,"));
        assert!(image.audio_base64.is_empty());

        let audio = Envelope::audio(Some(&ahmed()), DataUri::encode("audio/webm", b"ogg"));
        assert_eq!(audio.message_type, MessageKind::Audio);
        assert!(audio.message_text.is_empty());
        assert!(audio.image_base64.is_empty());
        assert!(audio.audio_base64.starts_with("data:audio/webm;base64,"));
    }

    #[test]
    fn test_data_uri_encoding() {
        let uri = DataUri::encode("text/plain", b"hello");
        assert_eq!(uri.as_str(), "data:text/plain;base64,aGVsbG8=");
        assert_eq!(uri.mime(), "text/plain");
    }
}

//! User-facing strings appended by the conversation.

/// Greeting, placeholders, caption and local error messages.
#[derive(Debug, Clone)]
pub struct ConversationTexts {
    /// Assistant message the log starts with; `None` starts empty.
    pub greeting: Option<String>,
    pub image_placeholder: String,
    pub audio_placeholder: String,
    /// Sent as `message_text` with images. Audio sends carry no caption.
    pub image_caption: String,
    pub media_too_large: String,
    pub permission_denied: String,
    pub capture_failed: String,
}

impl Default for ConversationTexts {
    fn default() -> Self {
        Self {
            greeting: Some("مرحباً! كيف يمكنني مساعدتك؟ 🌟".to_string()),
            image_placeholder: "📷 تم إرسال صورة".to_string(),
            audio_placeholder: "🎤 تم إرسال رسالة صوتية".to_string(),
            image_caption: "customer sent a photo".to_string(),
            media_too_large: "حجم الصورة كبير جداً، الحد الأقصى 5 ميجابايت.".to_string(),
            permission_denied: "لم يتم السماح بالوصول إلى الميكروفون.".to_string(),
            capture_failed: "تعذر تجهيز الملف، حاول مرة أخرى.".to_string(),
        }
    }
}

impl ConversationTexts {
    pub fn without_greeting(mut self) -> Self {
        self.greeting = None;
        self
    }
}

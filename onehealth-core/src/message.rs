use serde::{Deserialize, Serialize};

/// Role of a transcript entry, named as the frontend wire format expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

/// One turn of a chat transcript. Immutable once created; the transcript is
/// an append-only sequence in conversation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            text: text.into(),
        }
    }
}

/// One uploaded knowledge-base document, reduced to plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub name: String,
    pub content: String,
}

/// Fixed greeting every new chat session is seeded with. The chat exchange
/// drops it before talking to the model.
pub const SEED_GREETING: &str = "Halo! Saya Asisten AI One Health. Unggah dokumen di sebelah kiri untuk memberi saya basis pengetahuan, lalu ajukan pertanyaan tentang isinya.";

/// Fixed reply appended to the transcript when the model call fails.
pub const FALLBACK_REPLY: &str = "Maaf, terjadi kesalahan. Coba lagi nanti.";

use std::collections::BTreeMap;

use onehealth_core::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::state::ChatSession;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub documents: Vec<DocumentInfo>,
    pub links: Vec<String>,
}

impl SessionResponse {
    pub fn from_session(session: &ChatSession) -> Self {
        Self {
            session_id: session.id.clone(),
            messages: session.messages.clone(),
            documents: session
                .documents
                .iter()
                .map(|doc| DocumentInfo {
                    name: doc.name.clone(),
                    characters: doc.content.chars().count(),
                })
                .collect(),
            links: session.links.clone(),
        }
    }
}

/// Knowledge-base entry as shown to the client; content stays server-side.
#[derive(Debug, Serialize)]
pub struct DocumentInfo {
    pub name: String,
    pub characters: usize,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub session_id: String,
    pub reply: ChatMessage,
}

/// A base64-encoded upload payload.
#[derive(Debug, Deserialize)]
pub struct UploadFile {
    pub file_name: String,
    pub content_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Added,
    Failed,
}

/// Per-file outcome of a batch upload. Failures are surfaced, not dropped.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub file_name: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLinkRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictionApiRequest {
    pub disease_id: String,
    /// Inline CSV text; alternative to `file`.
    #[serde(default)]
    pub csv_data: Option<String>,
    /// Uploaded spreadsheet (`.csv`, `.xls`, `.xlsx`); alternative to `csv_data`.
    #[serde(default)]
    pub file: Option<UploadFile>,
    /// Enabled interventions by label, with effectiveness percentages.
    #[serde(default)]
    pub interventions: BTreeMap<String, i64>,
    pub model: String,
    pub prediction_months: i64,
}

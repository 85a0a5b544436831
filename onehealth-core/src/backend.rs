//! Gemini-backed [`CompletionBackend`] built on rig.

use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Chat, Message, Prompt},
    providers::gemini,
};

use crate::error::{ExchangeError, Result};
use crate::exchange::CompletionBackend;
use crate::message::{ChatMessage, MessageRole};
use crate::prompt::{CHAT_PREAMBLE, PREDICTION_PREAMBLE};

const CHAT_MODEL: &str = "gemini-2.5-flash";
// Data analysis gets the stronger model.
const PREDICTION_MODEL: &str = "gemini-2.5-pro";

/// Convert a transcript entry to a rig message.
fn to_rig_message(msg: &ChatMessage) -> Message {
    match msg.role {
        MessageRole::User => Message::user(msg.text.clone()),
        MessageRole::Model => Message::assistant(msg.text.clone()),
    }
}

/// Completion backend talking to Google Gemini through rig. Holds one agent
/// per concern: conversational replies and schema-constrained predictions.
pub struct GeminiBackend {
    chat_agent: Agent<gemini::completion::CompletionModel>,
    prediction_agent: Agent<gemini::completion::CompletionModel>,
}

impl GeminiBackend {
    /// Build from the `GEMINI_API_KEY` environment variable. The credential
    /// is consumed once at process start; there is no re-read.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ExchangeError::Completion("GEMINI_API_KEY not set".to_string()))?;
        Ok(Self::new(&api_key))
    }

    pub fn new(api_key: &str) -> Self {
        let client = gemini::Client::new(api_key);
        Self {
            chat_agent: client.agent(CHAT_MODEL).preamble(CHAT_PREAMBLE).build(),
            prediction_agent: client
                .agent(PREDICTION_MODEL)
                .preamble(PREDICTION_PREAMBLE)
                .build(),
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prediction_agent
            .prompt(prompt)
            .await
            .map_err(|e| ExchangeError::Completion(e.to_string()))
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let history: Vec<Message> = history.iter().map(to_rig_message).collect();
        self.chat_agent
            .chat(message, history)
            .await
            .map_err(|e| ExchangeError::Completion(e.to_string()))
    }
}

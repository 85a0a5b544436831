//! The two exchange components: the boundary code that turns user state into
//! a request to the external generative-AI service and validates the reply.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::extract::parse_prediction_response;
use crate::message::ChatMessage;
use crate::prediction::{PredictionRequest, PredictionResult};
use crate::prompt;

/// Boundary to the external completion service.
///
/// Implementations are expected to be cheap to share (`Arc`) and to perform
/// no retries of their own; retry policy belongs to whoever calls an
/// exchange.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Single-turn completion. Used by the prediction exchange.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Multi-turn chat completion with prior history.
    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String>;
}

/// Turns a [`PredictionRequest`] into a validated [`PredictionResult`], or
/// fails explicitly. Exactly one backend call per invocation: no retry, no
/// caching, no rate limiting.
pub struct PredictionExchange;

impl PredictionExchange {
    pub async fn run(
        backend: &dyn CompletionBackend,
        request: &PredictionRequest,
    ) -> Result<PredictionResult> {
        let prompt = prompt::build_prediction_prompt(request);
        info!(
            disease = request.disease.id,
            model = request.model.label(),
            months = request.prediction_months,
            interventions = request.interventions.len(),
            "requesting outbreak prediction"
        );

        let reply = backend.complete(&prompt).await?;
        let result = parse_prediction_response(&reply)?;

        info!(
            disease = request.disease.id,
            points = result.chart_data.len(),
            "prediction parsed"
        );
        Ok(result)
    }
}

/// Produces the next model utterance for a chat transcript.
pub struct ChatExchange;

impl ChatExchange {
    /// Send one user turn. The transcript's seed greeting is dropped, the
    /// remaining turns become history, and the new message is prefixed with
    /// the knowledge-base context when one is present. The reply is returned
    /// verbatim; free text needs no validation.
    pub async fn reply(
        backend: &dyn CompletionBackend,
        transcript: &[ChatMessage],
        message: &str,
        context: &str,
    ) -> Result<String> {
        let history: Vec<ChatMessage> = transcript.iter().skip(1).cloned().collect();
        let message = prompt::with_context(message, context);
        backend.chat(&history, &message).await
    }
}

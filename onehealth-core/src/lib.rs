pub mod catalog;
pub mod error;
pub mod exchange;
pub mod extract;
pub mod message;
pub mod prediction;
pub mod prompt;

#[cfg(feature = "rig")]
pub mod backend;

// Re-export commonly used types
pub use catalog::{DISEASES, Disease, find_disease};
pub use error::{ExchangeError, Result};
pub use exchange::{ChatExchange, CompletionBackend, PredictionExchange};
pub use extract::parse_prediction_response;
pub use message::{ChatMessage, FALLBACK_REPLY, MessageRole, SEED_GREETING, SourceDocument};
pub use prediction::{
    ChartPoint, Intervention, InterventionSet, MAX_PREDICTION_MONTHS, MIN_PREDICTION_MONTHS,
    ModelKind, PredictionRequest, PredictionResult, RiskLevel,
};

#[cfg(feature = "rig")]
pub use backend::GeminiBackend;

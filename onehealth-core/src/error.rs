use thiserror::Error;

/// Errors produced at the exchange boundary.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The model's reply could not be parsed into the expected schema.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),

    /// The external completion request itself failed (network, quota, service).
    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("case data is empty")]
    EmptyData,

    #[error("unknown intervention: {0}")]
    UnknownIntervention(String),

    #[error("unknown analysis model: {0}")]
    UnknownModel(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

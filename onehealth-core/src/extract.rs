//! Parsing of prediction replies into [`PredictionResult`].

use crate::error::{ExchangeError, Result};
use crate::prediction::PredictionResult;

/// Parse a model reply into a validated prediction.
///
/// The reply must contain a JSON object with all required fields; models
/// occasionally wrap it in prose or markdown fences, so the outermost brace
/// pair is located first. Missing `cases`/`predicted` values on chart points
/// deserialize to `None` and serialize back as explicit nulls, which is the
/// normalization the chart rendering relies on. Any parse, required-field or
/// enum mismatch fails with [`ExchangeError::InvalidResponse`] and no partial
/// result is produced.
pub fn parse_prediction_response(reply: &str) -> Result<PredictionResult> {
    let start = reply
        .find('{')
        .ok_or_else(|| ExchangeError::InvalidResponse("no JSON object in reply".to_string()))?;
    let end = reply
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| {
            ExchangeError::InvalidResponse("unterminated JSON object in reply".to_string())
        })?;

    serde_json::from_str(&reply[start..=end])
        .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))
}

//! Response envelope handling.

use wn_core::{AnalysisResponse, AnalysisResult};

use crate::error::{ClientError, ClientResult};

/// Message used when the service reports failure without saying why.
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// Longest body excerpt kept in a `Status` error.
const BODY_EXCERPT_LEN: usize = 200;

/// Unwrap a decoded envelope into its payload.
///
/// `success=false`, or `success=true` without `data`, is a failure carrying
/// the service's `error` text verbatim.
pub fn unwrap_envelope(envelope: AnalysisResponse) -> ClientResult<AnalysisResult> {
    match envelope {
        AnalysisResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        AnalysisResponse { error, .. } => Err(ClientError::Rejected(service_message(error))),
    }
}

/// Map a raw HTTP status and body to the analysis outcome.
pub fn interpret_response(status: u16, body: &str) -> ClientResult<AnalysisResult> {
    let parsed = serde_json::from_str::<AnalysisResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|envelope| envelope.error)
            .filter(|m| !m.is_empty());
        return Err(match message {
            Some(message) => ClientError::Rejected(message),
            None => ClientError::Status {
                status,
                message: excerpt(body),
            },
        });
    }

    let envelope = parsed.map_err(|e| ClientError::Decode(e.to_string()))?;
    unwrap_envelope(envelope)
}

fn service_message(error: Option<String>) -> String {
    error
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| ANALYSIS_FAILED.to_string())
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

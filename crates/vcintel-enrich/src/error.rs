use thiserror::Error;

/// Failures of the chat-completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing OPENAI_API_KEY in server environment")]
    MissingCredential,

    /// HTTP 429. The only model failure the pipeline recovers from.
    #[error("OpenAI quota exceeded")]
    QuotaExceeded,

    #[error("OpenAI request failed ({status}){}", detail_suffix(.details))]
    RequestFailed { status: u16, details: String },

    /// Connection failure or timeout; reported the same way as a failed request.
    #[error("OpenAI request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedResponse(String),
}

fn detail_suffix(details: &str) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(": {details}")
    }
}

/// Model output that decoded as JSON but does not satisfy the result schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("Model output was not a JSON object")]
    NotAnObject,

    #[error("Model output missing required what_they_do bullets (found {found}, need at least 3)")]
    WhatTheyDo { found: usize },

    #[error("Model output missing required keywords (found {found}, need at least 5)")]
    Keywords { found: usize },

    #[error("Model output missing required derived_signals (found {found}, need at least 2)")]
    DerivedSignals { found: usize },
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Invalid website payload")]
    InvalidInput,

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EnrichError {
    /// `true` when the caller sent something it can correct.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, EnrichError::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_includes_status_and_details() {
        let err = LlmError::RequestFailed {
            status: 500,
            details: "upstream exploded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OpenAI request failed (500): upstream exploded"
        );
    }

    #[test]
    fn request_failed_without_details_has_no_suffix() {
        let err = LlmError::RequestFailed {
            status: 503,
            details: String::new(),
        };
        assert_eq!(err.to_string(), "OpenAI request failed (503)");
    }

    #[test]
    fn enrich_error_is_transparent_over_model_errors() {
        let err = EnrichError::from(LlmError::MissingCredential);
        assert_eq!(
            err.to_string(),
            "Missing OPENAI_API_KEY in server environment"
        );
        assert!(!err.is_client_error());
        assert!(EnrichError::InvalidInput.is_client_error());
    }
}

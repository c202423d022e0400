//! Error type for the HTTP surface

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use email_triage_adapters::document::DocumentError;
use email_triage_domain::ChatError;
use email_triage_domain::usecases::ProcessError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Fixable by the client (empty content, malformed form)
    #[error("{0}")]
    BadRequest(String),
    /// Body larger than `server.max_upload_bytes`
    #[error("{0}")]
    PayloadTooLarge(String),
    /// The inference provider failed or was unreachable
    #[error("Inference API error: {0}")]
    Upstream(ChatError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an axum extractor rejection, keeping 413 for oversized bodies
    pub fn rejected(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(body_text)
        } else {
            ApiError::BadRequest(body_text)
        }
    }
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Validation(msg) => ApiError::BadRequest(msg),
            ProcessError::Chat(e) if e.is_upstream() => ApiError::Upstream(e),
            ProcessError::Chat(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(kind = "validation", error = %msg, "Request rejected");
            }
            ApiError::PayloadTooLarge(msg) => {
                tracing::warn!(kind = "too_large", error = %msg, "Request rejected");
            }
            ApiError::Upstream(e) => {
                tracing::error!(kind = "upstream", error = %e, "Process failed");
            }
            ApiError::Internal(msg) => {
                tracing::error!(kind = "internal", error = %msg, "Process failed");
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_mapping() {
        let validation: ApiError = ProcessError::Validation("vazio".to_string()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "vazio");

        let timeout: ApiError = ProcessError::Chat(ChatError::Timeout).into();
        assert_eq!(timeout.status(), StatusCode::BAD_GATEWAY);

        let status: ApiError = ProcessError::Chat(ChatError::Status {
            status: 429,
            body: "slow down".to_string(),
        })
        .into();
        assert_eq!(status.status(), StatusCode::BAD_GATEWAY);
        assert!(status.to_string().contains("slow down"));

        let config: ApiError = ProcessError::Chat(ChatError::Config("no key".to_string())).into();
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejection_keeps_payload_too_large() {
        let too_large = ApiError::rejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_string());
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let malformed = ApiError::rejected(StatusCode::UNPROCESSABLE_ENTITY, "bad".to_string());
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_document_error_is_internal() {
        let err: ApiError = DocumentError::Pdf("bad xref".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// Error types shared across the crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad or missing upload: no file part, empty filename, disallowed extension.
    #[error("{0}")]
    InvalidUpload(String),

    /// A required credential is empty.
    #[error("{0}")]
    Config(String),

    /// The image-hosting service rejected the upload or could not be reached.
    #[error("{0}")]
    ImageHost(String),

    /// The completion API answered with a non-success status.
    #[error("OpenAI API error: {0}")]
    Completion(String),

    /// The completion API could not be reached, or the call timed out.
    #[error("Request to OpenAI API failed: {0}")]
    CompletionTransport(String),

    /// The completion response did not have the expected shape.
    /// `raw` carries the remote payload so callers can diagnose it.
    #[error("Error parsing response: {message}")]
    ResponseParse {
        message: String,
        raw: serde_json::Value,
    },

    #[error("Server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::ImageHost(_)
            | AppError::Completion(_)
            | AppError::CompletionTransport(_)
            | AppError::ResponseParse { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::ResponseParse { raw, .. } => serde_json::json!({
                "error": self.to_string(),
                "raw_response": raw,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_are_client_errors() {
        let err = AppError::InvalidUpload("File type not allowed".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "File type not allowed");
    }

    #[test]
    fn remote_errors_are_server_errors() {
        for err in [
            AppError::Config("OpenAI API key is not configured".to_string()),
            AppError::ImageHost("Failed to upload image to hosting service".to_string()),
            AppError::Completion("bad request".to_string()),
            AppError::CompletionTransport("connection refused".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn completion_error_carries_remote_detail() {
        let err = AppError::Completion("invalid api key".to_string());
        assert_eq!(err.to_string(), "OpenAI API error: invalid api key");
    }

    #[test]
    fn parse_error_message_includes_cause() {
        let err = AppError::ResponseParse {
            message: "missing field `choices`".to_string(),
            raw: serde_json::json!({"unexpected": true}),
        };
        assert_eq!(
            err.to_string(),
            "Error parsing response: missing field `choices`"
        );
    }
}

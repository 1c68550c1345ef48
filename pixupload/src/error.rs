//! Erreurs de l'API d'upload et leur traduction en réponses HTTP

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use piximage::{PipelineError, Stage};
use serde::Serialize;
use utoipa::ToSchema;

/// Corps JSON des réponses d'erreur
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Code d'erreur (ex: NO_FILE, PROCESSING_FAILED)
    pub error: String,
    pub message: String,
    /// Étape du pipeline en échec, seulement pour PROCESSING_FAILED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),

    #[error("Request body too large: {0}")]
    TooLarge(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Processing(#[from] PipelineError),

    #[error("{0}")]
    Internal(String),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::NoFile | UploadError::InvalidMultipart(_) | UploadError::InvalidName(_) => {
                StatusCode::BAD_REQUEST
            }
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::NotFound(_) => StatusCode::NOT_FOUND,
            UploadError::Processing(_) | UploadError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NoFile => "NO_FILE",
            UploadError::InvalidMultipart(_) => "INVALID_MULTIPART",
            UploadError::TooLarge(_) => "PAYLOAD_TOO_LARGE",
            UploadError::UnsupportedMedia(_) => "UNSUPPORTED_MEDIA",
            UploadError::InvalidName(_) => "INVALID_NAME",
            UploadError::NotFound(_) => "NOT_FOUND",
            UploadError::Processing(_) => "PROCESSING_FAILED",
            UploadError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            UploadError::Processing(e) => ErrorResponse {
                error: self.code().to_string(),
                message: e.message(),
                stage: Some(e.stage),
            },
            _ => ErrorResponse {
                error: self.code().to_string(),
                message: self.to_string(),
                stage: None,
            },
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge(e.body_text())
        } else {
            UploadError::InvalidMultipart(e.body_text())
        }
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(e: MultipartRejection) -> Self {
        UploadError::InvalidMultipart(e.body_text())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "Upload failed: {}", self);
        } else {
            tracing::warn!(code = self.code(), "Upload rejected: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piximage::ProcessingError;

    #[test]
    fn test_no_file_body() {
        let body = serde_json::to_value(UploadError::NoFile.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "NO_FILE", "message": "No file uploaded" })
        );
    }

    #[test]
    fn test_processing_body_carries_stage() {
        let err = UploadError::from(PipelineError::new(
            Stage::Encode,
            ProcessingError::Codec("boom".into()),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "PROCESSING_FAILED");
        assert_eq!(body["stage"], "encode");
        assert!(body["message"].as_str().unwrap().contains("boom"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(UploadError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            UploadError::UnsupportedMedia("x".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            UploadError::TooLarge("x".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}

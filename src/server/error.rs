use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::warn;

use crate::error::{Pdf2MdError, ValidationError};
use crate::server::models::ErrorResponse;

/// Everything a handler can fail with, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload rejected before processing. 400.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Body exceeded the configured upload limit. 413.
    #[error("{0}")]
    TooLarge(String),

    /// Normalising or converting failed. 500.
    #[error("PDF processing failed: {0}")]
    Processing(#[from] Pdf2MdError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request_with_bare_message() {
        let e = ApiError::from(ValidationError::NotPdfFilename);
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "File must be a PDF");
    }

    #[test]
    fn processing_is_wrapped_with_prefix() {
        let e = ApiError::from(Pdf2MdError::WrongPassword);
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            e.to_string(),
            "PDF processing failed: Failed to decrypt PDF: incorrect password"
        );
    }
}

// 🚫 API Errors - handler failures mapped to HTTP responses
//
// Client errors carry their message in a JSON { "error": ... } body.
// Server errors carry only a fixed, generic message; the underlying cause is
// logged where it happens and never reaches the client.

use crate::expense::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of every JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or missing parameter (400)
    #[error("{0}")]
    BadRequest(String),

    /// Expense rejected by the rule set (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    /// Server-side failure reported as JSON (500)
    #[error("{0}")]
    Internal(&'static str),

    /// Server-side failure on a non-JSON route, reported as plain text (500)
    #[error("{0}")]
    PlainText(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::PlainText(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::PlainText(message) => (status, message).into_response(),
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

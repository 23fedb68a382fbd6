pub mod appointments;
pub mod health;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use datebook_core::DatebookError;
use datebook_core::store::protocol::ErrorResponse;

/// Convert datebook errors to HTTP responses
pub struct AppError(DatebookError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self.0 {
            DatebookError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            DatebookError::NotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Appointment {id} not found"))
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<DatebookError> for AppError {
    fn from(err: DatebookError) -> Self {
        Self(err)
    }
}

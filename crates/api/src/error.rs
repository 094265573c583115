//! JSON rendering of application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use carlot_core::resource::ResourceError;
use carlot_shared::AppError;

/// Handler error rendered as `{ success: false, error, message, .. }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.0.error_code();

        let body = match self.0 {
            AppError::Validation(errors) => json!({
                "success": false,
                "error": code,
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::UploadFailed { details } => json!({
                "success": false,
                "error": code,
                "message": "Error uploading images",
                "details": details,
            }),
            AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message) => json!({
                "success": false,
                "error": code,
                "message": message,
            }),
            err @ (AppError::Database(_) | AppError::Internal(_)) => {
                error!(error = %err, "Request failed");
                json!({
                    "success": false,
                    "error": code,
                    "message": "An internal error occurred",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

//! Resource error types.

use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use carlot_shared::AppError;

use super::validation::error_messages;
use crate::attachment::AttachmentError;

/// Errors from resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No record with this ID is visible to the caller.
    #[error("{kind} not found")]
    NotFound {
        /// Resource name.
        kind: &'static str,
        /// Requested ID.
        id: Uuid,
    },

    /// The caller does not own the record.
    #[error("Not authorized to modify this {}", .kind.to_lowercase())]
    Forbidden {
        /// Resource name.
        kind: &'static str,
        /// Requested ID.
        id: Uuid,
    },

    /// Payload fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Attachment synchronization failed.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ResourceError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    /// Create a forbidden error.
    #[must_use]
    pub fn forbidden(kind: &'static str, id: Uuid) -> Self {
        Self::Forbidden { kind, id }
    }

    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ResourceError::Forbidden { .. } => Self::Forbidden(err.to_string()),
            ResourceError::Validation(errors) => Self::Validation(error_messages(&errors)),
            ResourceError::Attachment(AttachmentError::AttachmentUploadFailed(failed)) => {
                Self::UploadFailed {
                    details: failed.cause.to_string(),
                }
            }
            ResourceError::Attachment(too_many @ AttachmentError::TooManyAttachments { .. }) => {
                Self::Validation(vec![too_many.to_string()])
            }
            ResourceError::Repository(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::UploadBatchFailed;
    use crate::storage::StorageError;

    #[test]
    fn test_messages_name_the_resource() {
        let id = Uuid::nil();
        assert_eq!(ResourceError::not_found("Car", id).to_string(), "Car not found");
        assert_eq!(
            ResourceError::forbidden("Car", id).to_string(),
            "Not authorized to modify this car"
        );
    }

    #[test]
    fn test_upload_failure_maps_to_bad_request_with_details() {
        let err = ResourceError::from(AttachmentError::from(UploadBatchFailed {
            index: 0,
            cause: StorageError::store_unavailable("bucket offline"),
        }));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 400);
        assert!(matches!(app, AppError::UploadFailed { details } if details.contains("bucket offline")));
    }

    #[test]
    fn test_too_many_maps_to_validation() {
        let app: AppError = ResourceError::from(AttachmentError::too_many(11, 10)).into();
        assert!(matches!(app, AppError::Validation(ref msgs) if msgs.len() == 1));
    }

    #[test]
    fn test_repository_error_is_server_side() {
        let app: AppError = ResourceError::repository("connection reset").into();
        assert!(!app.is_client_error());
    }
}

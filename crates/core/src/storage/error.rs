//! Storage error types.

use thiserror::Error;

/// Blob store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused the payload (malformed, empty, unsupported).
    #[error("upload rejected: {0}")]
    UploadRejected(String),

    /// The remote store failed or could not be reached.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(String),

    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// A locator from which no storage identifier can be derived.
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an upload rejected error.
    #[must_use]
    pub fn upload_rejected(msg: impl Into<String>) -> Self {
        Self::UploadRejected(msg.into())
    }

    /// Create a store unavailable error.
    #[must_use]
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            ErrorKind::Unsupported
            | ErrorKind::IsADirectory
            | ErrorKind::NotADirectory
            | ErrorKind::AlreadyExists
            | ErrorKind::ConditionNotMatch
            | ErrorKind::RangeNotSatisfied => Self::UploadRejected(err.to_string()),
            _ => Self::StoreUnavailable(err.to_string()),
        }
    }
}

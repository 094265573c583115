//! Attachment error types.

use thiserror::Error;

use crate::storage::{Locator, StorageError};

/// Errors surfaced by attachment synchronization.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Uploading the new attachments failed; the mutation must be rejected.
    #[error("attachment upload failed: {0}")]
    AttachmentUploadFailed(#[from] UploadBatchFailed),

    /// The resulting attachment list would exceed the per-resource limit.
    #[error("too many attachments: {count} exceeds the limit of {max}")]
    TooManyAttachments {
        /// Number of attachments the list would hold.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl AttachmentError {
    /// Create a too many attachments error.
    #[must_use]
    pub fn too_many(count: usize, max: usize) -> Self {
        Self::TooManyAttachments { count, max }
    }
}

/// The first failure of an upload batch.
#[derive(Debug, Error)]
#[error("upload #{index} failed: {cause}")]
pub struct UploadBatchFailed {
    /// Position of the failed upload in the batch.
    pub index: usize,
    /// Store error that aborted the batch.
    #[source]
    pub cause: StorageError,
}

/// A best-effort deletion that did not succeed.
///
/// Only ever logged; never returned to callers.
#[derive(Debug, Error)]
#[error("failed to delete {locator}: {cause}")]
pub struct DeletionFailed {
    /// Locator whose object may still exist.
    pub locator: Locator,
    /// Store error reported for the deletion.
    #[source]
    pub cause: StorageError,
}

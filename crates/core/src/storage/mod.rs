//! Blob store client for image attachments using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory (tests only)
//!
//! # Locators
//!
//! ```text
//! {public_base_url}/{folder}/{storage_id}.{ext}   <- returned by store()
//!                   {folder}/{storage_id}         <- object key
//! ```
//!
//! The storage identifier is recovered from a locator by taking its last
//! path segment and stripping the extension. Any other [`BlobStore`] must
//! produce locators of the same shape.

mod config;
mod error;
mod service;
mod types;

pub use carlot_shared::config::StorageProvider;
pub use config::StorageConfig;
pub use error::StorageError;
pub use service::StorageService;
pub use types::{Locator, PendingUpload};

use std::future::Future;

/// Remote object storage holding attachment payloads.
///
/// Each call performs exactly one remote operation. Implementations do not
/// cache or retry; retry policy belongs to the caller.
pub trait BlobStore: Send + Sync {
    /// Uploads a payload and returns its durable locator.
    ///
    /// Fails with [`StorageError::UploadRejected`] for a payload the store
    /// refuses and [`StorageError::StoreUnavailable`] for remote failures.
    fn store(
        &self,
        upload: &PendingUpload,
    ) -> impl Future<Output = Result<Locator, StorageError>> + Send;

    /// Deletes the object a locator refers to.
    ///
    /// An object that is already gone is reported as
    /// [`StorageError::NotFound`]; callers treat that as non-fatal.
    fn remove(&self, locator: &Locator) -> impl Future<Output = Result<(), StorageError>> + Send;
}

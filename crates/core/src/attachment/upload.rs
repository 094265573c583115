//! Concurrent batch upload of pending attachments.

use futures::future::try_join_all;
use tracing::debug;

use super::error::UploadBatchFailed;
use crate::storage::{BlobStore, Locator, PendingUpload};

/// Uploads every payload and returns their locators in input order.
///
/// Uploads run concurrently. The first failure aborts the batch: uploads
/// still in flight are dropped and locators already obtained are discarded.
/// Objects those discarded locators point to stay in the store.
///
/// # Errors
///
/// Returns [`UploadBatchFailed`] carrying the failing index and store error.
pub async fn upload_all<B: BlobStore>(
    store: &B,
    uploads: &[PendingUpload],
) -> Result<Vec<Locator>, UploadBatchFailed> {
    if uploads.is_empty() {
        return Ok(Vec::new());
    }

    let batch = uploads.iter().enumerate().map(|(index, upload)| async move {
        store
            .store(upload)
            .await
            .map_err(|cause| UploadBatchFailed { index, cause })
    });

    let locators = try_join_all(batch).await?;
    debug!(count = locators.len(), "Uploaded attachment batch");
    Ok(locators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::testing::FakeBlobStore;
    use crate::storage::StorageError;

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let store = FakeBlobStore::new();
        let locators = upload_all(&store, &[]).await.unwrap();

        assert!(locators.is_empty());
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_locators_follow_input_order() {
        let store = FakeBlobStore::new();
        // The first payload finishes last.
        let uploads = [
            FakeBlobStore::upload("slow-first"),
            FakeBlobStore::upload("b2"),
            FakeBlobStore::upload("b3"),
        ];

        let locators = upload_all(&store, &uploads).await.unwrap();

        assert_eq!(
            locators,
            vec![
                FakeBlobStore::locator("slow-first"),
                FakeBlobStore::locator("b2"),
                FakeBlobStore::locator("b3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_failure_aborts_batch() {
        let store = FakeBlobStore::new();
        store.fail_upload_of("b2");
        let uploads = [
            FakeBlobStore::upload("b1"),
            FakeBlobStore::upload("b2"),
            FakeBlobStore::upload("slow-b3"),
        ];

        let err = upload_all(&store, &uploads).await.unwrap_err();

        assert_eq!(err.index, 1);
        assert!(matches!(err.cause, StorageError::StoreUnavailable(_)));
        // Completed uploads are orphaned, in-flight ones never finish.
        assert!(store.contains(&FakeBlobStore::locator("b1")));
        assert!(!store.contains(&FakeBlobStore::locator("slow-b3")));
    }
}

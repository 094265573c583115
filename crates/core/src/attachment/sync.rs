//! Resource attachment synchronizer.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use super::diff::{AttachmentDiff, KeepList, diff};
use super::error::{AttachmentError, DeletionFailed};
use super::types::{AttachmentHolder, AttachmentList};
use super::upload::upload_all;
use crate::storage::{BlobStore, Locator, PendingUpload, StorageError};

/// Coordinates the blob store and a resource's attachment list.
///
/// One synchronizer serves every resource type; resources plug in through
/// [`AttachmentHolder`].
pub struct AttachmentSynchronizer<B> {
    store: Arc<B>,
}

impl<B> Clone for AttachmentSynchronizer<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: BlobStore> AttachmentSynchronizer<B> {
    /// Creates a synchronizer over a blob store.
    #[must_use]
    pub fn new(store: Arc<B>) -> Self {
        Self { store }
    }

    /// Create path: uploads the attachments of a resource about to be created.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::TooManyAttachments`] before any upload if
    /// the batch exceeds the limit, and
    /// [`AttachmentError::AttachmentUploadFailed`] if an upload fails. The
    /// resource must not be persisted in either case.
    pub async fn attach(&self, uploads: &[PendingUpload]) -> Result<AttachmentList, AttachmentError> {
        ensure_capacity(0, uploads.len())?;

        let locators = upload_all(&*self.store, uploads).await.map_err(|e| {
            error!(index = e.index, error = %e.cause, "Attachment upload failed");
            AttachmentError::from(e)
        })?;

        info!(count = locators.len(), "Attachments uploaded");
        AttachmentList::new(locators)
    }

    /// Update path: computes the attachment list after an update.
    ///
    /// Locators not named by `keep` are removed from the store best-effort,
    /// then `uploads` are uploaded. The result is the retained locators
    /// followed by the new ones.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::TooManyAttachments`] before any side
    /// effect if the result would exceed the limit, and
    /// [`AttachmentError::AttachmentUploadFailed`] if an upload fails. On
    /// upload failure the caller keeps `current` unchanged; deletions already
    /// made are not rolled back.
    pub async fn reconcile(
        &self,
        current: &AttachmentList,
        keep: &KeepList,
        uploads: &[PendingUpload],
    ) -> Result<AttachmentList, AttachmentError> {
        let AttachmentDiff {
            retained,
            to_delete,
        } = diff(current.as_slice(), keep);
        debug!(
            retained = retained.len(),
            to_delete = to_delete.len(),
            new = uploads.len(),
            "Attachment diff computed"
        );

        ensure_capacity(retained.len(), uploads.len())?;

        self.evict(&to_delete).await;

        let uploaded = upload_all(&*self.store, uploads).await.map_err(|e| {
            error!(index = e.index, error = %e.cause, "Attachment upload failed, update rejected");
            AttachmentError::from(e)
        })?;

        let mut locators = retained;
        locators.extend(uploaded);
        AttachmentList::new(locators)
    }

    /// Delete path: removes every attachment from the store best-effort.
    ///
    /// Never fails; the caller deletes the resource regardless.
    pub async fn release(&self, current: &AttachmentList) {
        let failures = self.evict(current.as_slice()).await;
        info!(
            count = current.len(),
            failures, "Attachments released"
        );
    }

    /// Runs [`Self::reconcile`] on a holder and swaps in the result.
    ///
    /// The holder is untouched when reconciliation fails.
    ///
    /// # Errors
    ///
    /// Same as [`Self::reconcile`].
    pub async fn sync<H: AttachmentHolder>(
        &self,
        holder: &mut H,
        keep: &KeepList,
        uploads: &[PendingUpload],
    ) -> Result<(), AttachmentError> {
        let attachments = self.reconcile(holder.attachments(), keep, uploads).await?;
        holder.replace_attachments(attachments);
        Ok(())
    }

    /// Removes locators concurrently, logging and counting failures.
    async fn evict(&self, locators: &[Locator]) -> usize {
        let removals = locators.iter().map(|locator| async move {
            self.store
                .remove(locator)
                .await
                .map_err(|cause| DeletionFailed {
                    locator: locator.clone(),
                    cause,
                })
        });

        let mut failures = 0;
        for failure in join_all(removals).await.into_iter().filter_map(Result::err) {
            failures += 1;
            if matches!(failure.cause, StorageError::NotFound { .. }) {
                warn!(locator = %failure.locator, "Attachment already absent from store");
            } else {
                warn!(locator = %failure.locator, error = %failure.cause, "Attachment deletion failed");
            }
        }
        failures
    }
}

fn ensure_capacity(kept: usize, added: usize) -> Result<(), AttachmentError> {
    let count = kept + added;
    if count > AttachmentList::MAX_LEN {
        return Err(AttachmentError::too_many(count, AttachmentList::MAX_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::testing::FakeBlobStore;

    fn list(names: &[&str]) -> AttachmentList {
        AttachmentList::new(names.iter().map(|n| FakeBlobStore::locator(n)).collect()).unwrap()
    }

    fn uploads(names: &[&str]) -> Vec<PendingUpload> {
        names.iter().map(|n| FakeBlobStore::upload(n)).collect()
    }

    struct Photos(AttachmentList);

    impl AttachmentHolder for Photos {
        fn attachments(&self) -> &AttachmentList {
            &self.0
        }

        fn replace_attachments(&mut self, attachments: AttachmentList) {
            self.0 = attachments;
        }
    }

    #[tokio::test]
    async fn test_create_uploads_in_order() {
        let store = Arc::new(FakeBlobStore::new());
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        let result = sync.attach(&uploads(&["l1", "l2"])).await.unwrap();

        assert_eq!(result, list(&["l1", "l2"]));
    }

    #[tokio::test]
    async fn test_create_without_uploads_is_empty() {
        let store = Arc::new(FakeBlobStore::new());
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        assert!(sync.attach(&[]).await.unwrap().is_empty());
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_eleven_before_uploading() {
        let store = Arc::new(FakeBlobStore::new());
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));
        let names: Vec<String> = (0..11).map(|i| format!("b{i}")).collect();
        let batch: Vec<_> = names.iter().map(|n| FakeBlobStore::upload(n)).collect();

        let err = sync.attach(&batch).await.unwrap_err();

        assert!(matches!(
            err,
            AttachmentError::TooManyAttachments { count: 11, max: 10 }
        ));
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_upload_failure() {
        let store = Arc::new(FakeBlobStore::new());
        store.fail_upload_of("l2");
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        let err = sync.attach(&uploads(&["l1", "l2"])).await.unwrap_err();

        assert!(matches!(err, AttachmentError::AttachmentUploadFailed(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_named_and_deletes_rest() {
        let current = list(&["l1", "l2", "l3"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        let result = sync
            .reconcile(&current, &KeepList::parse(Some("l2")), &[])
            .await
            .unwrap();

        assert_eq!(result, list(&["l2"]));
        assert!(!store.contains(&FakeBlobStore::locator("l1")));
        assert!(store.contains(&FakeBlobStore::locator("l2")));
        assert!(!store.contains(&FakeBlobStore::locator("l3")));
    }

    #[tokio::test]
    async fn test_update_appends_uploads_after_retained() {
        let current = list(&["l1", "l2", "l3"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));
        let keep = KeepList::from_iter([
            FakeBlobStore::locator("l3").into_string(),
            "l1".to_string(),
        ]);

        let result = sync
            .reconcile(&current, &keep, &uploads(&["slow-n1", "n2"]))
            .await
            .unwrap();

        assert_eq!(result, list(&["l1", "l3", "slow-n1", "n2"]));
        assert_eq!(store.removal_attempts(), vec![FakeBlobStore::locator("l2")]);
    }

    #[tokio::test]
    async fn test_update_with_empty_keep_list_drops_everything() {
        let current = list(&["l1", "l2"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        let result = sync
            .reconcile(&current, &KeepList::parse(None), &[])
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(store.removal_attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_update_upload_failure_leaves_holder_untouched() {
        let mut photos = Photos(list(&["l1"]));
        let store = Arc::new(FakeBlobStore::with_objects(photos.attachments()));
        store.fail_upload_of("l4");
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        let err = sync
            .sync(&mut photos, &KeepList::parse(Some("")), &uploads(&["l4"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AttachmentError::AttachmentUploadFailed(_)));
        assert_eq!(photos.attachments(), &list(&["l1"]));
        // Deletion already happened and is not rolled back.
        assert!(!store.contains(&FakeBlobStore::locator("l1")));
    }

    #[tokio::test]
    async fn test_update_over_limit_has_no_side_effects() {
        let current = list(&["l1", "l2", "l3", "l4", "l5", "l6", "l7", "l8"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));
        let keep = KeepList::parse(Some("l1,l2,l3,l4,l5,l6,l7,l8"));

        let err = sync
            .reconcile(&current, &keep, &uploads(&["n1", "n2", "n3"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AttachmentError::TooManyAttachments { count: 11, .. }
        ));
        assert!(store.removal_attempts().is_empty());
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_survives_failed_deletion() {
        let mut photos = Photos(list(&["l1", "l2"]));
        let store = Arc::new(FakeBlobStore::with_objects(photos.attachments()));
        store.fail_removal_of(&FakeBlobStore::locator("l1"));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        sync.sync(&mut photos, &KeepList::default(), &uploads(&["n1"]))
            .await
            .unwrap();

        assert_eq!(photos.attachments(), &list(&["n1"]));
        // The failed deletion leaves an orphan behind.
        assert!(store.contains(&FakeBlobStore::locator("l1")));
    }

    #[tokio::test]
    async fn test_release_is_best_effort() {
        let current = list(&["l1", "l2"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        store.fail_removal_of(&FakeBlobStore::locator("l1"));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        sync.release(&current).await;

        assert_eq!(store.removal_attempts().len(), 2);
        assert!(!store.contains(&FakeBlobStore::locator("l2")));
    }

    #[tokio::test]
    async fn test_release_twice_is_not_fatal() {
        let current = list(&["l1"]);
        let store = Arc::new(FakeBlobStore::with_objects(&current));
        let sync = AttachmentSynchronizer::new(Arc::clone(&store));

        sync.release(&current).await;
        sync.release(&current).await;

        assert_eq!(store.removal_attempts().len(), 2);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::attachment::testing::FakeBlobStore;
    use proptest::prelude::*;

    // For every update, the final list is the order-preserving retained
    // subset of the old list followed by the new uploads in input order.
    proptest! {
        #[test]
        fn prop_final_list_is_retained_then_uploaded(
            old in prop::collection::btree_set("o[0-9]{1,3}", 0..6),
            keep in prop::collection::vec("o[0-9]{1,3}", 0..6),
            new in prop::collection::btree_set("n[0-9]{1,3}", 0..4),
        ) {
            let old: Vec<Locator> = old.iter().map(|n| FakeBlobStore::locator(n)).collect();
            let current = AttachmentList::new(old.clone()).unwrap();
            let keep = KeepList::from_iter(keep);
            let batch: Vec<_> = new.iter().map(|n| FakeBlobStore::upload(n)).collect();

            let store = Arc::new(FakeBlobStore::with_objects(&old));
            let sync = AttachmentSynchronizer::new(Arc::clone(&store));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let result = runtime
                .block_on(sync.reconcile(&current, &keep, &batch))
                .unwrap();

            let mut expected: Vec<Locator> =
                old.iter().filter(|l| keep.keeps(l)).cloned().collect();
            expected.extend(new.iter().map(|n| FakeBlobStore::locator(n)));
            prop_assert_eq!(result.as_slice(), expected.as_slice());
        }
    }
}

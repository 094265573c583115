//! Resource service driving persistence and attachment sync.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::error::ResourceError;
use super::{Resource, ResourceRepository};
use crate::attachment::{AttachmentHolder, AttachmentSynchronizer, KeepList};
use crate::storage::{BlobStore, PendingUpload};

/// CRUD over one resource type with attachments kept in the blob store.
///
/// `caller` is the authenticated account, if any. Owned records are only
/// visible to their owner; records without an owner are visible to all.
pub struct ResourceService<R, B> {
    repo: Arc<R>,
    attachments: AttachmentSynchronizer<B>,
}

impl<R, B> ResourceService<R, B>
where
    R: ResourceRepository,
    B: BlobStore,
{
    const KIND: &'static str = <R::Resource as Resource>::NAME;

    /// Create a new resource service.
    #[must_use]
    pub fn new(repo: Arc<R>, store: Arc<B>) -> Self {
        Self {
            repo,
            attachments: AttachmentSynchronizer::new(store),
        }
    }

    /// Validates the draft, uploads its images and inserts the record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The draft fails validation
    /// - There are too many images or an upload fails (nothing is persisted)
    /// - The insert fails (uploaded images are released first)
    pub async fn create(
        &self,
        owner: Option<Uuid>,
        draft: R::Draft,
        uploads: &[PendingUpload],
    ) -> Result<R::Resource, ResourceError> {
        draft.validate()?;

        let images = self.attachments.attach(uploads).await?;

        match self.repo.insert(owner, draft, images.clone()).await {
            Ok(resource) => {
                info!(
                    kind = Self::KIND,
                    id = %resource.id(),
                    images = images.len(),
                    "Resource created"
                );
                Ok(resource)
            }
            Err(e) => {
                error!(kind = Self::KIND, error = %e, "Insert failed, releasing uploaded images");
                self.attachments.release(&images).await;
                Err(e)
            }
        }
    }

    /// Lists records visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(&self, caller: Option<Uuid>) -> Result<Vec<R::Resource>, ResourceError> {
        self.repo.list(caller).await
    }

    /// Fetches one record visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the record is missing or owned by another account.
    pub async fn get(&self, id: Uuid, caller: Option<Uuid>) -> Result<R::Resource, ResourceError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|resource| visible_to(resource.owner_id(), caller))
            .ok_or_else(|| ResourceError::not_found(Self::KIND, id))
    }

    /// Reconciles images against the keep-list, applies the patch and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The patch fails validation
    /// - The record is missing (`NotFound`) or owned by another account (`Forbidden`)
    /// - The result would hold too many images or an upload fails; the record
    ///   keeps its previous images
    /// - The update fails to persist
    pub async fn update(
        &self,
        id: Uuid,
        caller: Option<Uuid>,
        patch: <R::Resource as Resource>::Patch,
        keep: &KeepList,
        uploads: &[PendingUpload],
    ) -> Result<R::Resource, ResourceError> {
        patch.validate()?;

        let mut resource = self.find_owned(id, caller).await?;
        self.attachments.sync(&mut resource, keep, uploads).await?;
        resource.apply(patch);

        let updated = self.repo.update(&resource).await?;
        info!(
            kind = Self::KIND,
            %id,
            images = updated.attachments().len(),
            "Resource updated"
        );
        Ok(updated)
    }

    /// Releases the record's images and deletes it.
    ///
    /// Image removal is best-effort; the record is deleted regardless.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden` as for [`Self::update`], or a
    /// repository error.
    pub async fn delete(&self, id: Uuid, caller: Option<Uuid>) -> Result<(), ResourceError> {
        let resource = self.find_owned(id, caller).await?;
        self.attachments.release(resource.attachments()).await;

        if !self.repo.delete(id).await? {
            return Err(ResourceError::not_found(Self::KIND, id));
        }
        info!(kind = Self::KIND, %id, "Resource deleted");
        Ok(())
    }

    async fn find_owned(&self, id: Uuid, caller: Option<Uuid>) -> Result<R::Resource, ResourceError> {
        let resource = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ResourceError::not_found(Self::KIND, id))?;

        if !visible_to(resource.owner_id(), caller) {
            return Err(ResourceError::forbidden(Self::KIND, id));
        }
        Ok(resource)
    }
}

fn visible_to(owner: Option<Uuid>, caller: Option<Uuid>) -> bool {
    owner.is_none_or(|owner| caller == Some(owner))
}

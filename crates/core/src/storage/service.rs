//! Storage service implementation using Apache OpenDAL.

use opendal::{Operator, services};
use tracing::debug;
use uuid::Uuid;

use super::config::StorageConfig;
use super::error::StorageError;
use super::types::{Locator, PendingUpload};
use super::{BlobStore, StorageProvider};

/// OpenDAL-backed [`BlobStore`].
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder).map(|b| b.finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);
                Operator::new(builder).map(|b| b.finish())
            }
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|b| b.finish())
            }
            StorageProvider::Memory => {
                Operator::new(services::Memory::default()).map(|b| b.finish())
            }
        };

        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    /// Object key a locator refers to.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidLocator`] if no storage identifier can
    /// be derived from the locator.
    pub fn object_key_for(&self, locator: &Locator) -> Result<String, StorageError> {
        locator
            .storage_id()
            .map(|id| self.config.object_key(id))
            .ok_or_else(|| StorageError::InvalidLocator(locator.to_string()))
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl BlobStore for StorageService {
    async fn store(&self, upload: &PendingUpload) -> Result<Locator, StorageError> {
        if upload.is_empty() {
            return Err(StorageError::upload_rejected("empty payload"));
        }

        let storage_id = Uuid::now_v7().simple().to_string();
        let key = self.config.object_key(&storage_id);

        let write = self.operator.write_with(&key, upload.bytes().clone());
        if self.operator.info().full_capability().write_with_content_type {
            write.content_type(upload.media_type()).await?;
        } else {
            write.await?;
        }

        debug!(key = %key, size = upload.len(), "Stored object");
        Ok(Locator::new(
            self.config.locator_url(&storage_id, upload.extension()),
        ))
    }

    async fn remove(&self, locator: &Locator) -> Result<(), StorageError> {
        let key = self.object_key_for(locator)?;
        self.operator.delete(&key).await?;
        debug!(key = %key, "Removed object");
        Ok(())
    }
}

//! Storage configuration types.

use carlot_shared::config::{StorageProvider, StorageSettings};

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Public URL prefix of stored objects, without trailing slash.
    pub public_base_url: String,
    /// Key prefix for stored objects, without surrounding slashes.
    pub folder: String,
}

impl StorageConfig {
    /// Default key prefix for image objects.
    pub const DEFAULT_FOLDER: &'static str = "images";

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            folder: Self::DEFAULT_FOLDER.to_string(),
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into().trim_matches('/').to_string();
        self
    }

    /// Object key for a storage identifier.
    #[must_use]
    pub fn object_key(&self, storage_id: &str) -> String {
        if self.folder.is_empty() {
            storage_id.to_string()
        } else {
            format!("{}/{storage_id}", self.folder)
        }
    }

    /// Public locator URL for a storage identifier and file extension.
    #[must_use]
    pub fn locator_url(&self, storage_id: &str, extension: &str) -> String {
        format!(
            "{}/{}.{extension}",
            self.public_base_url,
            self.object_key(storage_id)
        )
    }
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        Self::new(settings.provider, settings.public_base_url).with_folder(settings.folder)
    }
}

//! In-memory blob store fake with failure injection.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::storage::{BlobStore, Locator, PendingUpload, StorageError};

/// Payloads starting with this prefix complete only after a short delay.
pub(crate) const SLOW_PREFIX: &str = "slow";

/// Fake store whose locators are derived from payload text:
/// payload `b1` is stored as `https://blobs.test/images/b1.png`.
#[derive(Default)]
pub(crate) struct FakeBlobStore {
    objects: Mutex<HashSet<Locator>>,
    failing_uploads: Mutex<HashSet<String>>,
    failing_removals: Mutex<HashSet<Locator>>,
    removal_attempts: Mutex<Vec<Locator>>,
    store_calls: AtomicUsize,
}

impl FakeBlobStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with existing objects.
    pub(crate) fn with_objects<'a>(locators: impl IntoIterator<Item = &'a Locator>) -> Self {
        let store = Self::new();
        store
            .objects
            .lock()
            .unwrap()
            .extend(locators.into_iter().cloned());
        store
    }

    pub(crate) fn locator(name: &str) -> Locator {
        Locator::new(format!("https://blobs.test/images/{name}.png"))
    }

    pub(crate) fn upload(name: &str) -> PendingUpload {
        PendingUpload::new(name.as_bytes().to_vec(), "image/png")
    }

    /// Uploads of this payload fail with `StoreUnavailable`.
    pub(crate) fn fail_upload_of(&self, name: &str) {
        self.failing_uploads.lock().unwrap().insert(name.to_string());
    }

    /// Removals of this locator fail with `StoreUnavailable`.
    pub(crate) fn fail_removal_of(&self, locator: &Locator) {
        self.failing_removals.lock().unwrap().insert(locator.clone());
    }

    pub(crate) fn contains(&self, locator: &Locator) -> bool {
        self.objects.lock().unwrap().contains(locator)
    }

    pub(crate) fn removal_attempts(&self) -> Vec<Locator> {
        self.removal_attempts.lock().unwrap().clone()
    }

    pub(crate) fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }
}

impl BlobStore for FakeBlobStore {
    async fn store(&self, upload: &PendingUpload) -> Result<Locator, StorageError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        let name = String::from_utf8_lossy(upload.bytes()).into_owned();

        if name.starts_with(SLOW_PREFIX) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.failing_uploads.lock().unwrap().contains(&name) {
            return Err(StorageError::store_unavailable(format!(
                "upload of {name} refused"
            )));
        }

        let locator = Self::locator(&name);
        self.objects.lock().unwrap().insert(locator.clone());
        Ok(locator)
    }

    async fn remove(&self, locator: &Locator) -> Result<(), StorageError> {
        self.removal_attempts.lock().unwrap().push(locator.clone());

        if self.failing_removals.lock().unwrap().contains(locator) {
            return Err(StorageError::store_unavailable("remote delete failed"));
        }
        if self.objects.lock().unwrap().remove(locator) {
            Ok(())
        } else {
            Err(StorageError::not_found(locator.as_str()))
        }
    }
}

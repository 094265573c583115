//! Blob-level value types.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Durable URL of one stored object.
///
/// Opaque to everything except [`Locator::storage_id`], which recovers the
/// identifier a store needs for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Wraps a locator string.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The locator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the locator, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Storage identifier: the last path segment up to its first `.`.
    ///
    /// Query strings and fragments are ignored. Returns `None` when the
    /// locator has no usable final segment.
    #[must_use]
    pub fn storage_id(&self) -> Option<&str> {
        let path = self.0.split(['?', '#']).next().unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        let id = segment.split('.').next().unwrap_or_default();
        (!id.is_empty()).then_some(id)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Locator {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// An in-memory payload awaiting upload.
///
/// Scoped to one mutation request; only the resulting [`Locator`] survives.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    bytes: Bytes,
    media_type: String,
    filename: Option<String>,
}

impl PendingUpload {
    /// Creates a pending upload from raw bytes and a declared media type.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            filename: None,
        }
    }

    /// Attaches the client-supplied filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Payload bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Declared media type, e.g. `image/png`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Original filename, if the client sent one.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension matching the declared media type.
    #[must_use]
    pub fn extension(&self) -> &str {
        let subtype = self
            .media_type
            .split(';')
            .next()
            .and_then(|essence| essence.trim().split('/').nth(1))
            .unwrap_or_default();

        match subtype {
            "jpeg" | "pjpeg" => "jpg",
            "svg+xml" => "svg",
            "x-icon" | "vnd.microsoft.icon" => "ico",
            "" => "bin",
            other if other.chars().all(|c| c.is_ascii_alphanumeric()) => other,
            _ => "bin",
        }
    }
}

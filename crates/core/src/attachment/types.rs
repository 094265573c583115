//! Attachment list and the per-resource adapter.

use serde::{Deserialize, Serialize};

use super::error::AttachmentError;
use crate::storage::Locator;

/// Ordered attachment locators of one resource, at most [`Self::MAX_LEN`].
///
/// Order is keep order followed by upload order and carries no ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Locator>", try_from = "Vec<Locator>")]
pub struct AttachmentList(Vec<Locator>);

impl AttachmentList {
    /// Maximum number of attachments per resource.
    pub const MAX_LEN: usize = 10;

    /// Creates a list, enforcing the length limit.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::TooManyAttachments`] for more than
    /// [`Self::MAX_LEN`] locators.
    pub fn new(locators: Vec<Locator>) -> Result<Self, AttachmentError> {
        if locators.len() > Self::MAX_LEN {
            return Err(AttachmentError::too_many(locators.len(), Self::MAX_LEN));
        }
        Ok(Self(locators))
    }

    /// Creates an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Locators in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Locator] {
        &self.0
    }

    /// Iterates over the locators in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Locator> {
        self.0.iter()
    }

    /// Number of locators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Locators as plain strings, for persistence.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|l| l.as_str().to_string()).collect()
    }
}

impl TryFrom<Vec<Locator>> for AttachmentList {
    type Error = AttachmentError;

    fn try_from(locators: Vec<Locator>) -> Result<Self, Self::Error> {
        Self::new(locators)
    }
}

impl TryFrom<Vec<String>> for AttachmentList {
    type Error = AttachmentError;

    fn try_from(urls: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(urls.into_iter().map(Locator::from).collect())
    }
}

impl From<AttachmentList> for Vec<Locator> {
    fn from(list: AttachmentList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a AttachmentList {
    type Item = &'a Locator;
    type IntoIter = std::slice::Iter<'a, Locator>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Adapter exposing a resource's attachment list to the synchronizer.
///
/// The list is owned by value; the synchronizer only ever swaps it whole.
pub trait AttachmentHolder {
    /// Current attachment list.
    fn attachments(&self) -> &AttachmentList;

    /// Replaces the attachment list.
    fn replace_attachments(&mut self, attachments: AttachmentList);
}

//! Cars: account-owned listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use super::validation::non_blank;
use crate::attachment::{AttachmentHolder, AttachmentList};

/// A car listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Record ID.
    pub id: Uuid,
    /// Owning account.
    pub owner_id: Uuid,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Photo locators.
    pub images: AttachmentList,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AttachmentHolder for Car {
    fn attachments(&self) -> &AttachmentList {
        &self.images
    }

    fn replace_attachments(&mut self, attachments: AttachmentList) {
        self.images = attachments;
    }
}

impl Resource for Car {
    const NAME: &'static str = "Car";
    type Patch = CarPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }

    fn apply(&mut self, patch: CarPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// Fields of a car to create.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewCar {
    /// Listing title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Listing description.
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl NewCar {
    /// Builds a draft from raw form fields. Missing text becomes empty and
    /// fails validation.
    #[must_use]
    pub fn from_fields(title: Option<&str>, description: Option<&str>, tags: Option<&str>) -> Self {
        Self {
            title: non_blank(title).unwrap_or_default(),
            description: non_blank(description).unwrap_or_default(),
            tags: tags.map(parse_tags).unwrap_or_default(),
        }
    }
}

/// Partial car update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CarPatch {
    /// New title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    /// New description.
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

impl CarPatch {
    /// Builds a patch from raw form fields. Blank text keeps the current value.
    #[must_use]
    pub fn from_fields(title: Option<&str>, description: Option<&str>, tags: Option<&str>) -> Self {
        Self {
            title: non_blank(title),
            description: non_blank(description),
            tags: non_blank(tags).as_deref().map(parse_tags),
        }
    }
}

/// Splits a comma-delimited tag field, trimming entries and dropping blanks.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

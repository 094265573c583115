//! People: standalone contact records exposed as `/users`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use super::validation::{non_blank, validate_name, validate_phone};
use crate::attachment::{AttachmentHolder, AttachmentList};

/// A person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Record ID.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Ten-digit phone number.
    pub phone: String,
    /// Lowercased email address.
    pub email: String,
    /// Photo locators.
    pub images: AttachmentList,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AttachmentHolder for Person {
    fn attachments(&self) -> &AttachmentList {
        &self.images
    }

    fn replace_attachments(&mut self, attachments: AttachmentList) {
        self.images = attachments;
    }
}

impl Resource for Person {
    const NAME: &'static str = "User";
    type Patch = PersonPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    fn apply(&mut self, patch: PersonPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

/// Fields of a person to create.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPerson {
    /// Full name.
    #[validate(
        custom(function = "validate_name", message = "Name must contain only alphabets and spaces"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    pub name: String,
    /// Phone number.
    #[validate(custom(function = "validate_phone", message = "Phone number must be exactly 10 digits"))]
    pub phone: String,
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl NewPerson {
    /// Builds a draft from raw form fields, trimming text and lowercasing the
    /// email. Missing fields become empty and fail validation.
    #[must_use]
    pub fn from_fields(name: Option<&str>, phone: Option<&str>, email: Option<&str>) -> Self {
        Self {
            name: non_blank(name).unwrap_or_default(),
            phone: non_blank(phone).unwrap_or_default(),
            email: non_blank(email).map(|e| e.to_lowercase()).unwrap_or_default(),
        }
    }
}

/// Partial person update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PersonPatch {
    /// New name.
    #[validate(
        custom(function = "validate_name", message = "Name must contain only alphabets and spaces"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    pub name: Option<String>,
    /// New phone number.
    #[validate(custom(function = "validate_phone", message = "Phone number must be exactly 10 digits"))]
    pub phone: Option<String>,
    /// New email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl PersonPatch {
    /// Builds a patch from raw form fields. Blank text keeps the current value.
    #[must_use]
    pub fn from_fields(name: Option<&str>, phone: Option<&str>, email: Option<&str>) -> Self {
        Self {
            name: non_blank(name),
            phone: non_blank(phone),
            email: non_blank(email).map(|e| e.to_lowercase()),
        }
    }
}

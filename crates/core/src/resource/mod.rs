//! Resources carrying image attachments.
//!
//! Cars and people share one service; each type plugs in through
//! [`Resource`] and a [`ResourceRepository`] implemented by the db crate.

mod car;
mod error;
mod person;
mod service;
mod validation;

use std::future::Future;

use uuid::Uuid;
use validator::Validate;

use crate::attachment::{AttachmentHolder, AttachmentList};

pub use car::{Car, CarPatch, NewCar, parse_tags};
pub use error::ResourceError;
pub use person::{NewPerson, Person, PersonPatch};
pub use service::ResourceService;
pub use validation::{error_messages, validate_name, validate_phone};

/// A persisted record that owns an attachment list.
pub trait Resource: AttachmentHolder + Send + Sync {
    /// Display name used in messages.
    const NAME: &'static str;

    /// Partial update payload.
    type Patch: Validate + Send;

    /// Record ID.
    fn id(&self) -> Uuid;

    /// Owning account; `None` for records visible to everyone.
    fn owner_id(&self) -> Option<Uuid>;

    /// Applies a validated patch to the non-attachment fields.
    fn apply(&mut self, patch: Self::Patch);
}

/// Repository trait for resource persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ResourceRepository: Send + Sync {
    /// Record type.
    type Resource: Resource;

    /// Creation payload.
    type Draft: Validate + Send;

    /// Insert a new record with its attachments.
    fn insert(
        &self,
        owner: Option<Uuid>,
        draft: Self::Draft,
        images: AttachmentList,
    ) -> impl Future<Output = Result<Self::Resource, ResourceError>> + Send;

    /// Find a record by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Self::Resource>, ResourceError>> + Send;

    /// List records, restricted to one owner when given.
    fn list(
        &self,
        owner: Option<Uuid>,
    ) -> impl Future<Output = Result<Vec<Self::Resource>, ResourceError>> + Send;

    /// Persist every field of an existing record and return the stored row.
    fn update(
        &self,
        resource: &Self::Resource,
    ) -> impl Future<Output = Result<Self::Resource, ResourceError>> + Send;

    /// Delete a record by ID. Returns false if no row matched.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, ResourceError>> + Send;
}

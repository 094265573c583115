//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod car;
pub mod person;

pub use account::AccountRepository;
pub use car::CarRepository;
pub use person::PersonRepository;

use carlot_core::attachment::AttachmentList;
use carlot_core::resource::ResourceError;
use sea_orm::DbErr;

fn repository_error(e: DbErr) -> ResourceError {
    ResourceError::repository(e.to_string())
}

/// Rebuilds an attachment list from a stored `TEXT[]` column.
fn stored_images(images: Vec<String>) -> Result<AttachmentList, ResourceError> {
    AttachmentList::try_from(images).map_err(|e| ResourceError::repository(e.to_string()))
}

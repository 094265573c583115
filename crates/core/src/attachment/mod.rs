//! Image attachment synchronization.
//!
//! Keeps a resource's attachment list and the blob store in step across
//! create, update and delete, with no transaction spanning the two:
//!
//! ```text
//! create:  Init -> Uploading -> Attached
//! update:  Init -> Diffing -> Deleting -> Uploading -> Attached
//! delete:  Init -> Deleting -> Done
//! ```
//!
//! Upload failures abort the mutation. Deletion failures are logged and
//! swallowed, so objects whose deletion failed become orphans in the store.
//! Objects uploaded by an aborted batch are orphaned the same way. Nothing
//! reconciles them.

mod diff;
mod error;
mod sync;
mod types;
mod upload;

pub use diff::{AttachmentDiff, KeepList, diff};
pub use error::{AttachmentError, DeletionFailed, UploadBatchFailed};
pub use sync::AttachmentSynchronizer;
pub use types::{AttachmentHolder, AttachmentList};
pub use upload::upload_all;

#[cfg(test)]
pub(crate) mod testing;

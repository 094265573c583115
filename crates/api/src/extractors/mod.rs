//! Request extractors.

pub mod multipart;

pub use multipart::ResourceForm;

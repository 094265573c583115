//! Core business logic for Carlot.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `storage` - Blob store client over Apache OpenDAL
//! - `attachment` - Image attachment synchronization (diff, upload, reconcile)
//! - `resource` - Cars and people records and their service
//! - `auth` - Password hashing

pub mod attachment;
pub mod auth;
pub mod resource;
pub mod storage;

//! Alumnet Storage Library
//!
//! Object-store abstraction used by the upload pipeline, with a local
//! filesystem backend and an S3-compatible backend.
//!
//! # Object layout
//!
//! Objects live at `{bucket}/{key}`. `put` returns the stored path inside the
//! bucket and `public_url` turns a bucket and path into a URL clients can load.
//!
//! Keys must not contain `..`, backslashes or a leading `/`. Key generation and
//! validation are centralized in the `keys` module so every backend agrees.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use alumnet_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};

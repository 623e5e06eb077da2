//! Storage abstraction trait
//!
//! This module defines the Storage trait that all object-store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
///
/// Backends classify failures when they raise them: [`StorageError::UploadFailed`]
/// and IO errors are transient, everything else is permanent. See
/// [`StorageError::is_transient`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether sending the same request again may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::UploadFailed(_) | StorageError::IoError(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The remote store offers no partial-progress events and no resumable
/// uploads: a `put` either stores the whole payload or fails.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` in `bucket` and return the stored path.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Public URL of a stored path
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StorageError::UploadFailed("timeout".into()).is_transient());
        assert!(StorageError::IoError(std::io::Error::other("reset")).is_transient());
        assert!(!StorageError::Rejected("403".into()).is_transient());
        assert!(!StorageError::InvalidKey("..".into()).is_transient());
        assert!(!StorageError::ConfigError("bucket".into()).is_transient());
    }
}

use std::path::PathBuf;

use alumnet_core::{ErrorMetadata, LogLevel, MediaKind};
use alumnet_processing::{AssetUnreadable, SizeExceeded, ValidationError};
use alumnet_storage::StorageError;

/// Why an asset did not make it to the object store.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    AssetUnreadable(#[from] AssetUnreadable),

    #[error(transparent)]
    TooLarge(SizeExceeded),

    #[error("Asset is empty: {}", .0.display())]
    EmptyAsset(PathBuf),

    #[error("Upload failed after {attempts} attempt(s): {source}")]
    TransferFailed {
        attempts: u32,
        #[source]
        source: StorageError,
    },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Lift a size validation failure onto the asset it was raised for.
    pub fn from_validation(err: ValidationError, path: impl Into<PathBuf>) -> Self {
        match err {
            ValidationError::FileTooLarge(exceeded) => UploadError::TooLarge(exceeded),
            ValidationError::EmptyFile => UploadError::EmptyAsset(path.into()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, UploadError::Cancelled)
    }
}

/// (error_code, is_recoverable, suggested_action, log_level)
fn upload_error_static_metadata(
    err: &UploadError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        UploadError::AssetUnreadable(_) => (
            "ASSET_UNREADABLE",
            false,
            Some("Select the file again"),
            LogLevel::Warn,
        ),
        UploadError::TooLarge(exceeded) => (
            "ASSET_TOO_LARGE",
            false,
            Some(match exceeded.kind {
                MediaKind::Image => "Choose a smaller image",
                MediaKind::Video => "Choose a shorter video or lower its resolution",
            }),
            LogLevel::Debug,
        ),
        UploadError::EmptyAsset(_) => (
            "ASSET_EMPTY",
            false,
            Some("Select a different file"),
            LogLevel::Debug,
        ),
        UploadError::TransferFailed { source, .. } => (
            "TRANSFER_FAILED",
            source.is_transient(),
            Some("Check your connection and try again"),
            LogLevel::Error,
        ),
        UploadError::InvalidKey(_) => ("INVALID_KEY", false, None, LogLevel::Warn),
        UploadError::Cancelled => ("UPLOAD_CANCELLED", true, None, LogLevel::Debug),
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        upload_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        upload_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::AssetUnreadable(_) => "The selected file could not be read".to_string(),
            UploadError::TooLarge(_) => self.to_string(),
            UploadError::EmptyAsset(_) => "The selected file is empty".to_string(),
            UploadError::TransferFailed { .. } => "Upload failed. Please try again.".to_string(),
            UploadError::InvalidKey(_) => "Invalid file name".to_string(),
            UploadError::Cancelled => "Upload cancelled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumnet_core::constants::BYTES_PER_MB;

    #[test]
    fn test_too_large_message_carries_sizes() {
        let err = UploadError::TooLarge(SizeExceeded {
            kind: MediaKind::Video,
            size_bytes: 150 * BYTES_PER_MB,
            limit_bytes: 100 * BYTES_PER_MB,
        });
        assert_eq!(err.to_string(), "Video too large: 150.0MB (max: 100MB)");
        assert_eq!(err.error_code(), "ASSET_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), err.to_string());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_transfer_failed_recoverability_follows_source() {
        let transient = UploadError::TransferFailed {
            attempts: 3,
            source: StorageError::UploadFailed("timeout".to_string()),
        };
        assert!(transient.is_recoverable());
        assert_eq!(transient.client_message(), "Upload failed. Please try again.");
        assert!(transient.to_string().contains("3 attempt(s)"));

        let permanent = UploadError::TransferFailed {
            attempts: 1,
            source: StorageError::Rejected("access denied".to_string()),
        };
        assert!(!permanent.is_recoverable());
        assert_eq!(permanent.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_from_validation() {
        let err = UploadError::from_validation(
            ValidationError::FileTooLarge(SizeExceeded {
                kind: MediaKind::Image,
                size_bytes: 12 * BYTES_PER_MB,
                limit_bytes: 10 * BYTES_PER_MB,
            }),
            "photo.jpg",
        );
        assert_eq!(err.to_string(), "Image too large: 12.0MB (max: 10MB)");

        let err = UploadError::from_validation(ValidationError::EmptyFile, "empty.jpg");
        assert!(matches!(err, UploadError::EmptyAsset(_)));
        assert_eq!(err.error_code(), "ASSET_EMPTY");
    }

    #[test]
    fn test_cancelled() {
        assert!(UploadError::Cancelled.is_cancelled());
        assert!(UploadError::Cancelled.is_recoverable());
    }
}

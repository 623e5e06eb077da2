//! Shared key generation and validation for storage backends.
//!
//! Generated keys look like `{kind folder}/{unix millis}_{uuid}.{extension}`,
//! e.g. `images/1718031234567_3f0c...e1.jpg`. The UUID makes keys unique even
//! when the same asset is uploaded twice within one millisecond.

use alumnet_core::MediaKind;
use chrono::Utc;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const MAX_SEGMENT_LEN: usize = 255;

/// Generate a fresh object key for an asset of `kind`.
pub fn generate_object_key(kind: MediaKind, extension: &str) -> String {
    format!("{}/{}", kind.folder(), generate_file_name(extension))
}

/// Generate a unique file name with the given extension.
pub fn generate_file_name(extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_lowercase();
    format!(
        "{}_{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}

/// Reject keys that could escape the bucket or that name no object.
///
/// Every `/`-separated segment must be non-empty and not `.`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == ".") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key has an empty or '.' segment: {}",
            key
        )));
    }
    Ok(())
}

/// Turn a caller-supplied file name into a storage key.
///
/// Path separators are kept so callers can place objects in folders
/// (`avatars/42.jpg`); every segment is reduced to `[A-Za-z0-9._-]`.
pub fn object_key_from_file_name(file_name: &str) -> StorageResult<String> {
    validate_key(file_name)?;

    let segments: Vec<String> = file_name.split('/').map(sanitize_segment).collect();
    Ok(segments.join("/"))
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .take(MAX_SEGMENT_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_unique() {
        let a = generate_object_key(MediaKind::Image, "jpg");
        let b = generate_object_key(MediaKind::Image, "jpg");
        assert_ne!(a, b);
        assert!(a.starts_with("images/"));
        assert!(a.ends_with(".jpg"));
    }

    #[test]
    fn test_generated_file_name_normalizes_extension() {
        let name = generate_file_name(".MP4");
        assert!(name.ends_with(".mp4"));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/absolute.jpg").is_err());
        assert!(validate_key("a\\b.jpg").is_err());
        assert!(validate_key("   ").is_err());
        assert!(validate_key("images/ok.jpg").is_ok());
        assert!(validate_key(".hidden.jpg").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_dot_and_empty_segments() {
        for key in ["a/.", ".", "./a.jpg", "a/./b.jpg", "a//b.jpg", "a/"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "{key} accepted"
            );
        }
    }

    #[test]
    fn test_object_key_from_file_name_sanitizes_segments() {
        let key = object_key_from_file_name("avatars/user 42 (1).jpg").unwrap();
        assert_eq!(key, "avatars/user_42__1_.jpg");

        assert!(object_key_from_file_name("posts//photo.png").is_err());
        assert!(object_key_from_file_name("posts/.").is_err());
        assert!(object_key_from_file_name("../photo.png").is_err());
    }
}

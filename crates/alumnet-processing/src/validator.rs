use alumnet_core::constants::BYTES_PER_MB;
use alumnet_core::{MediaKind, SizeCheck, TransferOptions};

/// An asset over the ceiling for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "{} too large: {:.1}MB (max: {}MB)",
    kind_label(.kind),
    megabytes(.size_bytes),
    .limit_bytes / BYTES_PER_MB
)]
pub struct SizeExceeded {
    pub kind: MediaKind,
    pub size_bytes: u64,
    pub limit_bytes: u64,
}

/// Size validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    FileTooLarge(SizeExceeded),

    #[error("Empty file")]
    EmptyFile,
}

fn kind_label(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "Image",
        MediaKind::Video => "Video",
    }
}

fn megabytes(bytes: &u64) -> f64 {
    bytes_to_mb(*bytes)
}

pub fn bytes_to_mb(size_bytes: u64) -> f64 {
    size_bytes as f64 / BYTES_PER_MB as f64
}

/// Size ceilings per media kind
///
/// Runs before any network activity; for images it runs on the optimized
/// output so a successfully compressed image is judged by its new size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeValidator {
    max_image_bytes: u64,
    max_video_bytes: u64,
}

impl SizeValidator {
    pub fn new(max_image_size_mb: u64, max_video_size_mb: u64) -> Self {
        Self {
            max_image_bytes: max_image_size_mb.saturating_mul(BYTES_PER_MB),
            max_video_bytes: max_video_size_mb.saturating_mul(BYTES_PER_MB),
        }
    }

    pub fn from_options(options: &TransferOptions) -> Self {
        Self::new(options.max_image_size_mb, options.max_video_size_mb)
    }

    pub fn limit_bytes(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.max_image_bytes,
            MediaKind::Video => self.max_video_bytes,
        }
    }

    /// Validate file size
    pub fn validate(&self, size_bytes: u64, kind: MediaKind) -> Result<(), ValidationError> {
        if size_bytes == 0 {
            return Err(ValidationError::EmptyFile);
        }

        let limit_bytes = self.limit_bytes(kind);
        if size_bytes > limit_bytes {
            return Err(ValidationError::FileTooLarge(SizeExceeded {
                kind,
                size_bytes,
                limit_bytes,
            }));
        }

        Ok(())
    }

    /// Same check, shaped for display.
    pub fn check(&self, size_bytes: u64, kind: MediaKind) -> SizeCheck {
        let size_mb = bytes_to_mb(size_bytes);
        match self.validate(size_bytes, kind) {
            Ok(()) => SizeCheck::ok(size_mb),
            Err(e) => SizeCheck::rejected(size_mb, e.to_string()),
        }
    }
}

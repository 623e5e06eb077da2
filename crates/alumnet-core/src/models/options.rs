use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BUCKET, DEFAULT_MAX_DIMENSION_PX,
    DEFAULT_MAX_IMAGE_SIZE_MB, DEFAULT_MAX_RETRIES, DEFAULT_MAX_VIDEO_SIZE_MB,
    DEFAULT_QUALITY_FACTOR,
};
use crate::models::progress::{ProgressCallback, ProgressReport};

/// How images are shrunk before upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationPolicy {
    /// Longer edge of the output image, in pixels.
    pub max_dimension_px: u32,
    /// JPEG quality in `0.0..=1.0`.
    pub quality_factor: f32,
}

impl Default for OptimizationPolicy {
    fn default() -> Self {
        Self {
            max_dimension_px: DEFAULT_MAX_DIMENSION_PX,
            quality_factor: DEFAULT_QUALITY_FACTOR,
        }
    }
}

impl OptimizationPolicy {
    /// Quality mapped onto the encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality_factor.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Per-call upload options.
#[derive(Clone)]
pub struct TransferOptions {
    pub bucket: String,
    /// Total attempts per asset, first try included.
    pub max_retries: u32,
    /// Attempt `n` that failed waits `backoff_base * 2^n` before the next one.
    pub backoff_base: Duration,
    pub max_video_size_mb: u64,
    pub max_image_size_mb: u64,
    pub optimization: OptimizationPolicy,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            max_video_size_mb: DEFAULT_MAX_VIDEO_SIZE_MB,
            max_image_size_mb: DEFAULT_MAX_IMAGE_SIZE_MB,
            optimization: OptimizationPolicy::default(),
            on_progress: None,
        }
    }
}

impl TransferOptions {
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn with_progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(ProgressReport) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }
}

impl fmt::Debug for TransferOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferOptions")
            .field("bucket", &self.bucket)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("max_video_size_mb", &self.max_video_size_mb)
            .field("max_image_size_mb", &self.max_image_size_mb)
            .field("optimization", &self.optimization)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TransferOptions::default();
        assert_eq!(options.bucket, "media");
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.backoff_base, Duration::from_secs(1));
        assert_eq!(options.max_video_size_mb, 100);
        assert_eq!(options.max_image_size_mb, 10);
        assert!(options.on_progress.is_none());
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(OptimizationPolicy::default().jpeg_quality(), 85);
        let policy = OptimizationPolicy {
            max_dimension_px: 100,
            quality_factor: 0.0,
        };
        assert_eq!(policy.jpeg_quality(), 1);
        let policy = OptimizationPolicy {
            max_dimension_px: 100,
            quality_factor: 3.0,
        };
        assert_eq!(policy.jpeg_quality(), 100);
    }
}

//! Configuration module
//!
//! Upload pipeline configuration loaded from the environment (and an optional
//! `.env` file): storage backend selection, bucket, retry policy, size
//! ceilings and image optimization settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BUCKET, DEFAULT_MAX_DIMENSION_PX, DEFAULT_MAX_IMAGE_SIZE_MB,
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_VIDEO_SIZE_MB, DEFAULT_QUALITY_FACTOR,
};
use crate::models::{OptimizationPolicy, TransferOptions};
use crate::storage_types::StorageBackend;

const LOCAL_STORAGE_PATH: &str = "./data/uploads";
const LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/uploads";

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub storage_backend: StorageBackend,
    pub bucket: String,
    // S3 configuration
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase storage, etc.)
    // Local storage configuration
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    // Transfer configuration
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub max_image_size_mb: u64,
    pub max_video_size_mb: u64,
    // Image optimization
    pub image_max_dimension_px: u32,
    pub image_quality: f32,
    /// Where optimized images are written before upload.
    pub optimized_asset_dir: PathBuf,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Local,
        };

        let bucket = lookup("UPLOAD_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let max_retries = match lookup("UPLOAD_MAX_RETRIES") {
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("UPLOAD_MAX_RETRIES must be a valid number"))?,
            None => DEFAULT_MAX_RETRIES,
        };

        let config = UploadConfig {
            storage_backend,
            bucket,
            s3_region: lookup("S3_REGION").or_else(|| lookup("AWS_REGION")),
            s3_endpoint: lookup("S3_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| LOCAL_STORAGE_BASE_URL.to_string()),
            max_retries,
            backoff_base_ms: lookup("UPLOAD_BACKOFF_BASE_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BACKOFF_BASE_MS),
            max_image_size_mb: lookup("MAX_IMAGE_SIZE_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_SIZE_MB),
            max_video_size_mb: lookup("MAX_VIDEO_SIZE_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB),
            image_max_dimension_px: lookup("IMAGE_MAX_DIMENSION_PX")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_DIMENSION_PX),
            image_quality: lookup("IMAGE_QUALITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUALITY_FACTOR),
            optimized_asset_dir: lookup("OPTIMIZED_ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("alumnet-optimized")),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_BUCKET must not be empty"));
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_RETRIES must be at least 1"));
        }

        if !(0.0..=1.0).contains(&self.image_quality) {
            return Err(anyhow::anyhow!(
                "IMAGE_QUALITY must be between 0.0 and 1.0"
            ));
        }

        if self.image_max_dimension_px == 0 {
            return Err(anyhow::anyhow!(
                "IMAGE_MAX_DIMENSION_PX must be greater than 0"
            ));
        }

        if self.storage_backend == StorageBackend::S3 && self.s3_region.is_none() {
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION to be set"
            ));
        }

        Ok(())
    }

    pub fn optimization_policy(&self) -> OptimizationPolicy {
        OptimizationPolicy {
            max_dimension_px: self.image_max_dimension_px,
            quality_factor: self.image_quality,
        }
    }

    /// Transfer options seeded from this configuration, without a progress callback.
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            bucket: self.bucket.clone(),
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            max_video_size_mb: self.max_video_size_mb,
            max_image_size_mb: self.max_image_size_mb,
            optimization: self.optimization_policy(),
            on_progress: None,
        }
    }
}

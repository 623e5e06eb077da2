use std::sync::Arc;

use alumnet_core::constants::DEFAULT_MAX_IMAGE_SIZE_MB;
use alumnet_core::{AssetRef, SizeCheck, TransferOptions, UploadConfig};
use alumnet_processing::{AssetSource, FsAssetSource, ImageOptimizer, JpegOptimizer, SizeValidator};
use alumnet_storage::keys::object_key_from_file_name;
use alumnet_storage::{Storage, StorageError};
use tokio_util::sync::CancellationToken;

use crate::batch::BatchOrchestrator;
use crate::error::UploadError;
use crate::pipeline::{AssetPipeline, ObjectKey, UploadOutcome, UploadedAsset};
use crate::progress::MonotonicProgress;
use crate::transfer::TransferEngine;

/// Entry point of the media upload pipeline.
///
/// Cheap to clone; clones share the storage backend and can run
/// independent uploads concurrently.
#[derive(Clone)]
pub struct MediaUploader {
    pipeline: Arc<AssetPipeline>,
    max_image_size_mb: u64,
}

impl MediaUploader {
    pub fn new(
        storage: Arc<dyn Storage>,
        source: Arc<dyn AssetSource>,
        optimizer: Arc<dyn ImageOptimizer>,
    ) -> Self {
        let engine = TransferEngine::new(storage);
        Self {
            pipeline: Arc::new(AssetPipeline::new(source, optimizer, engine)),
            max_image_size_mb: DEFAULT_MAX_IMAGE_SIZE_MB,
        }
    }

    /// Filesystem assets and JPEG optimization into `config.optimized_asset_dir`.
    pub fn from_config(storage: Arc<dyn Storage>, config: &UploadConfig) -> Self {
        Self::new(
            storage,
            Arc::new(FsAssetSource),
            Arc::new(JpegOptimizer::new(config.optimized_asset_dir.clone())),
        )
        .with_max_image_size_mb(config.max_image_size_mb)
    }

    /// Image ceiling used by [`validate_file_size`](Self::validate_file_size).
    pub fn with_max_image_size_mb(mut self, max_image_size_mb: u64) -> Self {
        self.max_image_size_mb = max_image_size_mb;
        self
    }

    /// Upload one asset under a key derived from `file_name`.
    pub async fn upload_file(
        &self,
        asset: &AssetRef,
        file_name: &str,
        options: &TransferOptions,
    ) -> Result<UploadedAsset, UploadError> {
        let key = object_key_from_file_name(file_name).map_err(|e| match e {
            StorageError::InvalidKey(msg) => UploadError::InvalidKey(msg),
            other => UploadError::InvalidKey(other.to_string()),
        })?;

        let progress = options.on_progress.clone().map(MonotonicProgress::new);
        let cancel = CancellationToken::new();

        let result = self
            .pipeline
            .process(
                asset,
                ObjectKey::Named(key),
                options,
                progress.as_ref(),
                &cancel,
            )
            .await;

        if let Err(e) = &result {
            tracing::warn!(asset = %asset, file_name = %file_name, error = %e, "Upload failed");
        }
        result
    }

    /// Upload `assets` sequentially under generated keys.
    pub async fn upload_batch(
        &self,
        assets: &[AssetRef],
        options: &TransferOptions,
    ) -> Vec<UploadOutcome> {
        self.upload_batch_with_cancel(assets, options, &CancellationToken::new())
            .await
    }

    /// Like [`upload_batch`](Self::upload_batch). Once `cancel` fires the
    /// in-flight asset is abandoned and every unresolved asset resolves to
    /// [`UploadError::Cancelled`]; outcomes already resolved are kept.
    pub async fn upload_batch_with_cancel(
        &self,
        assets: &[AssetRef],
        options: &TransferOptions,
        cancel: &CancellationToken,
    ) -> Vec<UploadOutcome> {
        BatchOrchestrator::new(self.pipeline.clone())
            .run(assets, options, cancel)
            .await
    }

    /// Preflight size check on the asset as selected, before any optimization.
    pub async fn validate_file_size(&self, asset: &AssetRef, max_video_size_mb: u64) -> SizeCheck {
        match self.pipeline.source().inspect(asset).await {
            Ok(info) => SizeValidator::new(self.max_image_size_mb, max_video_size_mb)
                .check(info.size_bytes, asset.kind()),
            Err(e) => SizeCheck::rejected(0.0, e.to_string()),
        }
    }
}

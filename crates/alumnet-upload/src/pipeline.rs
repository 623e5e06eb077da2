//! Per-asset upload pipeline: inspect → optimize → validate → transfer.

use std::path::Path;
use std::sync::Arc;

use alumnet_core::{AssetRef, TransferOptions};
use alumnet_processing::{content_type_for, AssetSource, ImageOptimizer, SizeValidator};
use alumnet_storage::keys::generate_object_key;
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;
use crate::progress::MonotonicProgress;
use crate::transfer::{TransferEngine, TransferRequest};

/// A successfully stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedAsset {
    pub url: String,
    pub storage_path: String,
    pub key: String,
    pub bucket: String,
    pub content_type: String,
    /// Bytes actually sent (after optimization).
    pub size_bytes: u64,
    /// Whether the optimized rendition was sent instead of the original.
    pub optimized: bool,
    pub attempts: u32,
}

pub type UploadOutcome = Result<UploadedAsset, UploadError>;

/// How the object key of an asset is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKey {
    /// `{folder}/{millis}_{uuid}.{ext}` derived from the asset sent.
    Generated,
    /// Caller-chosen key, already sanitized.
    Named(String),
}

/// Runs one asset through every stage up to the object store.
pub struct AssetPipeline {
    source: Arc<dyn AssetSource>,
    optimizer: Arc<dyn ImageOptimizer>,
    engine: TransferEngine,
}

impl AssetPipeline {
    pub fn new(
        source: Arc<dyn AssetSource>,
        optimizer: Arc<dyn ImageOptimizer>,
        engine: TransferEngine,
    ) -> Self {
        Self {
            source,
            optimizer,
            engine,
        }
    }

    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    pub async fn process(
        &self,
        asset: &AssetRef,
        key: ObjectKey,
        options: &TransferOptions,
        progress: Option<&MonotonicProgress>,
        cancel: &CancellationToken,
    ) -> UploadOutcome {
        let original = self.source.inspect(asset).await?;
        tracing::debug!(
            asset = %asset,
            kind = %asset.kind(),
            size_bytes = original.size_bytes,
            "Processing asset"
        );

        let optimized = self.optimize(asset, options).await;
        let effective = optimized.as_ref().unwrap_or(asset);

        let result = self
            .store(effective, optimized.is_some(), key, options, progress, cancel)
            .await;

        if let Some(artifact) = optimized.as_ref().filter(|a| a.path() != asset.path()) {
            remove_artifact(artifact.path()).await;
        }

        result
    }

    /// Optimized rendition of an image, or `None` to send the original.
    async fn optimize(&self, asset: &AssetRef, options: &TransferOptions) -> Option<AssetRef> {
        if !asset.is_image() {
            return None;
        }

        match self.optimizer.optimize(asset, &options.optimization).await {
            Ok(optimized) => Some(optimized),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    asset = %asset,
                    "Image optimization failed, uploading original"
                );
                None
            }
        }
    }

    async fn store(
        &self,
        asset: &AssetRef,
        optimized: bool,
        key: ObjectKey,
        options: &TransferOptions,
        progress: Option<&MonotonicProgress>,
        cancel: &CancellationToken,
    ) -> UploadOutcome {
        let info = self.source.inspect(asset).await?;

        SizeValidator::from_options(options)
            .validate(info.size_bytes, asset.kind())
            .map_err(|e| {
                tracing::debug!(asset = %asset, error = %e, "Asset rejected by size validation");
                UploadError::from_validation(e, asset.path())
            })?;

        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let data = self.source.read_bytes(asset).await?;
        let key = match key {
            ObjectKey::Generated => generate_object_key(asset.kind(), &asset.extension()),
            ObjectKey::Named(key) => key,
        };
        let content_type = content_type_for(asset);
        let size_bytes = data.len() as u64;

        let stored = self
            .engine
            .upload(
                TransferRequest {
                    data: Bytes::from(data),
                    key: &key,
                    content_type,
                },
                options,
                progress,
                cancel,
            )
            .await?;

        Ok(UploadedAsset {
            url: stored.url,
            storage_path: stored.storage_path,
            key,
            bucket: options.bucket.clone(),
            content_type: content_type.to_string(),
            size_bytes,
            optimized,
            attempts: stored.attempts,
        })
    }
}

async fn remove_artifact(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(
            path = %path.display(),
            error = %e,
            "Failed to remove optimized artifact"
        );
    }
}

use std::io::Cursor;
use std::path::PathBuf;

use alumnet_core::{AssetRef, OptimizationPolicy};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use uuid::Uuid;

use super::resize::ImageResize;

/// Errors raised while optimizing an image.
///
/// Never surfaced to callers of the upload pipeline: a failed optimization
/// falls back to the original asset.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Asset is not an image: {0}")]
    NotAnImage(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding or encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Optimization task failed: {0}")]
    TaskFailed(String),
}

/// Encoded result of an optimization.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Produces a smaller rendition of an image asset.
#[async_trait]
pub trait ImageOptimizer: Send + Sync {
    /// Returns a new asset pointing at the optimized output. The input asset
    /// is left untouched.
    async fn optimize(
        &self,
        asset: &AssetRef,
        policy: &OptimizationPolicy,
    ) -> Result<AssetRef, ProcessingError>;
}

/// Downscales and re-encodes images as JPEG into `output_dir`.
#[derive(Debug, Clone)]
pub struct JpegOptimizer {
    output_dir: PathBuf,
}

impl JpegOptimizer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Decode, downscale and encode in memory. CPU bound; call from a
    /// blocking context.
    pub fn optimize_bytes(
        data: &[u8],
        policy: &OptimizationPolicy,
    ) -> Result<OptimizedImage, ProcessingError> {
        let img = image::load_from_memory(data)?;
        let resized = ImageResize::downscale(img, policy.max_dimension_px);
        let (width, height) = resized.dimensions();

        // JPEG has no alpha channel
        let rgb = resized.to_rgb8();
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut cursor, policy.jpeg_quality());
            encoder.encode_image(&rgb)?;
        }

        Ok(OptimizedImage {
            data: cursor.into_inner(),
            width,
            height,
        })
    }
}

#[async_trait]
impl ImageOptimizer for JpegOptimizer {
    async fn optimize(
        &self,
        asset: &AssetRef,
        policy: &OptimizationPolicy,
    ) -> Result<AssetRef, ProcessingError> {
        if !asset.is_image() {
            return Err(ProcessingError::NotAnImage(asset.path().to_path_buf()));
        }

        let start = std::time::Instant::now();
        let data = tokio::fs::read(asset.path()).await?;
        let original_size = data.len();

        let policy = *policy;
        let optimized =
            tokio::task::spawn_blocking(move || Self::optimize_bytes(&data, &policy))
                .await
                .map_err(|e| ProcessingError::TaskFailed(e.to_string()))??;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self
            .output_dir
            .join(format!("{}.jpg", Uuid::new_v4().simple()));
        tokio::fs::write(&output_path, &optimized.data).await?;

        tracing::debug!(
            source = %asset.path().display(),
            output = %output_path.display(),
            original_size_bytes = original_size,
            optimized_size_bytes = optimized.data.len(),
            width = optimized.width,
            height = optimized.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image optimized"
        );

        Ok(AssetRef::image(output_path))
    }
}

//! Asset fixtures: generated images, sized payloads and stub optimizers.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use alumnet_core::{AssetRef, OptimizationPolicy};
use alumnet_processing::{AssetSource, AssetUnreadable, ImageOptimizer, ProcessingError};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Encoded PNG with a gradient so the encoder has something to work with.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// Write a PNG image asset into `dir`.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> AssetRef {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).unwrap();
    AssetRef::image(path)
}

/// Write `size_bytes` of filler as a video asset into `dir`.
pub fn write_video(dir: &Path, name: &str, size_bytes: usize) -> AssetRef {
    let path = dir.join(name);
    std::fs::write(&path, vec![0x42u8; size_bytes]).unwrap();
    AssetRef::video(path)
}

/// Asset source serving registered sizes without touching the disk and
/// falling back to the filesystem for everything else.
#[derive(Default)]
pub struct FakeAssetSource {
    sizes: HashMap<PathBuf, u64>,
}

impl FakeAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        self.sizes.insert(path.into(), size_bytes);
        self
    }
}

#[async_trait]
impl AssetSource for FakeAssetSource {
    async fn stat_size(&self, asset: &AssetRef) -> Result<u64, AssetUnreadable> {
        match self.sizes.get(asset.path()) {
            Some(size) => Ok(*size),
            None => tokio::fs::metadata(asset.path())
                .await
                .map(|m| m.len())
                .map_err(|e| AssetUnreadable::new(asset, e)),
        }
    }

    async fn read_bytes(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetUnreadable> {
        match self.sizes.get(asset.path()) {
            Some(size) => Ok(vec![0u8; *size as usize]),
            None => tokio::fs::read(asset.path())
                .await
                .map_err(|e| AssetUnreadable::new(asset, e)),
        }
    }
}

/// Optimizer that always fails.
pub struct FailingOptimizer;

#[async_trait]
impl ImageOptimizer for FailingOptimizer {
    async fn optimize(
        &self,
        _asset: &AssetRef,
        _policy: &OptimizationPolicy,
    ) -> Result<AssetRef, ProcessingError> {
        Err(ProcessingError::Io(io::Error::other("encoder crashed")))
    }
}

/// Optimizer whose output is a file of a fixed size in `output_dir`.
pub struct FixedSizeOptimizer {
    pub output_dir: PathBuf,
    pub size_bytes: usize,
}

#[async_trait]
impl ImageOptimizer for FixedSizeOptimizer {
    async fn optimize(
        &self,
        asset: &AssetRef,
        _policy: &OptimizationPolicy,
    ) -> Result<AssetRef, ProcessingError> {
        let stem = asset
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let path = self.output_dir.join(format!("{stem}-optimized.jpg"));
        tokio::fs::write(&path, vec![0xFFu8; self.size_bytes]).await?;
        Ok(AssetRef::image(path))
    }
}

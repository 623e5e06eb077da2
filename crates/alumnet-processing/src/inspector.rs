//! Asset inspection: size metadata and payload bytes of local assets.

use alumnet_core::AssetRef;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// The local source of an asset could not be read. Waiting will not fix a
/// missing file, so callers never retry this.
#[derive(Debug, thiserror::Error)]
#[error("Asset unreadable: {}: {source}", path.display())]
pub struct AssetUnreadable {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl AssetUnreadable {
    pub fn new(asset: &AssetRef, source: io::Error) -> Self {
        Self {
            path: asset.path().to_path_buf(),
            source,
        }
    }
}

/// Metadata of a local asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub size_bytes: u64,
}

/// Byte source for local assets.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Size of the asset without reading its content.
    async fn stat_size(&self, asset: &AssetRef) -> Result<u64, AssetUnreadable>;

    /// Whole asset content.
    async fn read_bytes(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetUnreadable>;

    async fn inspect(&self, asset: &AssetRef) -> Result<AssetInfo, AssetUnreadable> {
        let size_bytes = self.stat_size(asset).await?;
        Ok(AssetInfo { size_bytes })
    }
}

/// Asset source backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSource;

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn stat_size(&self, asset: &AssetRef) -> Result<u64, AssetUnreadable> {
        let meta = tokio::fs::metadata(asset.path())
            .await
            .map_err(|e| AssetUnreadable::new(asset, e))?;

        if !meta.is_file() {
            return Err(AssetUnreadable::new(
                asset,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        Ok(meta.len())
    }

    async fn read_bytes(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetUnreadable> {
        tokio::fs::read(asset.path())
            .await
            .map_err(|e| AssetUnreadable::new(asset, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_inspect_reports_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let info = FsAssetSource.inspect(&AssetRef::image(&path)).await.unwrap();
        assert_eq!(info.size_bytes, 4096);
    }

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let asset = AssetRef::image(dir.path().join("missing.jpg"));

        let err = FsAssetSource.inspect(&asset).await.unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.jpg"));
        assert!(FsAssetSource.read_bytes(&asset).await.is_err());
    }

    #[tokio::test]
    async fn test_directory_is_unreadable() {
        let dir = tempdir().unwrap();
        let asset = AssetRef::video(dir.path());

        let err = FsAssetSource.stat_size(&asset).await.unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_read_bytes_returns_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"video payload").unwrap();

        let bytes = FsAssetSource.read_bytes(&AssetRef::video(&path)).await.unwrap();
        assert_eq!(bytes, b"video payload");
    }
}

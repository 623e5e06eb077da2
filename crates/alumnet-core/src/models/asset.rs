use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kind of a user-selected asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Infer the kind from a file extension (case insensitive, without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "heic" | "heif" | "bmp" => {
                Some(MediaKind::Image)
            }
            "mp4" | "mov" | "m4v" | "webm" | "avi" | "mkv" | "3gp" => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Folder prefix used for generated object keys.
    pub fn folder(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Extension used when the asset path has none.
    pub fn default_extension(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Handle to a local asset selected by the user.
///
/// Created by the caller and consumed by the pipeline. The optimizer never
/// mutates an `AssetRef`; it hands back a new one pointing at its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    path: PathBuf,
    kind: MediaKind,
}

impl AssetRef {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::new(path, MediaKind::Image)
    }

    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self::new(path, MediaKind::Video)
    }

    /// Build a reference whose kind is inferred from the path extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = MediaKind::from_path(&path)?;
        Some(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn is_image(&self) -> bool {
        self.kind == MediaKind::Image
    }

    /// Lowercased extension, falling back to the kind's default.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| self.kind.default_extension().to_string())
    }
}

impl Display for AssetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.path.display(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("heic"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("mov"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("pdf"), None);
    }

    #[test]
    fn test_asset_from_path_infers_kind() {
        let asset = AssetRef::from_path("/tmp/clip.MP4").unwrap();
        assert_eq!(asset.kind(), MediaKind::Video);
        assert_eq!(asset.extension(), "mp4");
        assert!(AssetRef::from_path("/tmp/notes.txt").is_none());
    }

    #[test]
    fn test_extension_falls_back_to_kind_default() {
        let asset = AssetRef::image("/tmp/photo");
        assert_eq!(asset.extension(), "jpg");
        let asset = AssetRef::video("/tmp/clip");
        assert_eq!(asset.extension(), "mp4");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }
}

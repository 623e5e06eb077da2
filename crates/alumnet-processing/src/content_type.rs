use alumnet_core::{AssetRef, MediaKind};

/// MIME type sent to the object store for an asset.
///
/// Unknown extensions fall back to a generic type for the asset kind.
pub fn content_type_for(asset: &AssetRef) -> &'static str {
    match asset.extension().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        // Videos
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "3gp" => "video/3gpp",
        _ => match asset.kind() {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(&AssetRef::image("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for(&AssetRef::image("a.png")), "image/png");
        assert_eq!(content_type_for(&AssetRef::video("a.mov")), "video/quicktime");
    }

    #[test]
    fn test_unknown_extension_uses_kind_default() {
        assert_eq!(content_type_for(&AssetRef::image("a.raw")), "image/jpeg");
        assert_eq!(content_type_for(&AssetRef::video("a.bin")), "video/mp4");
    }
}

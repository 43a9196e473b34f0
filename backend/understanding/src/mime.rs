//! Image MIME detection by file extension.

use std::path::Path;

/// Detect an image MIME type by file extension. Non-image files yield `None`.
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png"          => Some("image/png"),
        "gif"          => Some("image/gif"),
        "webp"         => Some("image/webp"),
        "avif"         => Some("image/avif"),
        "bmp"          => Some("image/bmp"),
        "heic"         => Some("image/heic"),
        "tiff" | "tif" => Some("image/tiff"),
        _              => None,
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

pub mod image;
pub mod mime;
pub mod scan;
pub mod vision;

pub use image::{estimated_decoded_size, ImagePayload, MAX_IMAGE_BYTES};
pub use mime::{detect_image_mime, is_image};
pub use scan::{ProfileScanner, ScanOutcome, SCAN_STYLE};
pub use vision::VisionAnalyzer;

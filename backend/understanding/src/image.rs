//! Validation of user-supplied profile photos before they reach the model.

use base64::{engine::general_purpose::STANDARD, Engine};

use icebot_core::ValidationError;

use crate::mime::is_image;

/// Largest decoded image the vision endpoint accepts.
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Decoded size implied by `base64_len` characters of base64.
pub fn estimated_decoded_size(base64_len: usize) -> usize {
    (base64_len * 3).div_ceil(4)
}

/// A validated image, held as base64 with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime: String,
    base64: String,
}

impl ImagePayload {
    /// Accept either a `data:image/<type>;base64,` URL or bare base64 plus an
    /// `image/*` MIME hint.
    ///
    /// Checks run cheapest first; the size limit is enforced before the body
    /// is decoded.
    pub fn parse(image_data: &str, mime_hint: Option<&str>) -> Result<Self, ValidationError> {
        let data = image_data.trim();
        if data.is_empty() {
            return Err(ValidationError::MissingImage);
        }

        let (mime, body) = match data.strip_prefix("data:") {
            Some(rest) => {
                let (header, body) = rest
                    .split_once(',')
                    .ok_or(ValidationError::InvalidImageFormat)?;
                let mime = header
                    .strip_suffix(";base64")
                    .filter(|m| is_image(m))
                    .ok_or(ValidationError::InvalidImageFormat)?;
                (mime.to_ascii_lowercase(), body)
            }
            None => match mime_hint.map(str::trim).filter(|h| !h.is_empty()) {
                Some(hint) if is_image(hint) => (hint.to_ascii_lowercase(), data),
                _ => return Err(ValidationError::InvalidImageFormat),
            },
        };

        if body.is_empty() {
            return Err(ValidationError::InvalidImageData);
        }

        let estimated_bytes = estimated_decoded_size(body.len());
        if estimated_bytes > MAX_IMAGE_BYTES {
            return Err(ValidationError::PayloadTooLarge {
                estimated_bytes,
                limit_bytes: MAX_IMAGE_BYTES,
            });
        }

        STANDARD
            .decode(body)
            .map_err(|_| ValidationError::InvalidImageData)?;

        Ok(Self {
            mime,
            base64: body.to_string(),
        })
    }

    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        if !is_image(mime) {
            return Err(ValidationError::InvalidImageFormat);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::PayloadTooLarge {
                estimated_bytes: bytes.len(),
                limit_bytes: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self {
            mime: mime.trim().to_ascii_lowercase(),
            base64: STANDARD.encode(bytes),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn estimated_size(&self) -> usize {
        estimated_decoded_size(self.base64.len())
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

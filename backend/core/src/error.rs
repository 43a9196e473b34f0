use thiserror::Error;

/// Top-level error type for IceBot.
#[derive(Debug, Error)]
pub enum IcebotError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned {status_code}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream {
        status_code: u16,
        message: Option<String>,
    },

    #[error("upstream response contained no completion text")]
    EmptyResponse,

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl IcebotError {
    /// Whether the failure came from the network/API layer.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Upstream { .. }
                | Self::EmptyResponse
                | Self::MalformedResponse(_)
        )
    }
}

/// Bad input shape. Every variant carries a message fit for the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No image provided")]
    MissingImage,

    #[error("Invalid image format")]
    InvalidImageFormat,

    #[error("Invalid image data")]
    InvalidImageData,

    #[error("Image size too large. Please use an image under {}MB.", .limit_bytes / (1024 * 1024))]
    PayloadTooLarge {
        estimated_bytes: usize,
        limit_bytes: usize,
    },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Add their message first to get a response")]
    NoMatchMessage,

    #[error("No previous message to respond to")]
    NoPreviousMessage,

    #[error("Only your own messages can be regenerated or enhanced")]
    NotOwnMessage,

    #[error("Unknown style: {0}")]
    UnknownStyle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_message_names_limit() {
        let err = ValidationError::PayloadTooLarge {
            estimated_bytes: 5 * 1024 * 1024,
            limit_bytes: 4 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "Image size too large. Please use an image under 4MB."
        );
    }

    #[test]
    fn upstream_display_without_message() {
        let err = IcebotError::Upstream {
            status_code: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "upstream returned 503: no message");
        assert!(err.is_upstream());
    }

    #[test]
    fn validation_converts_into_top_level() {
        let err: IcebotError = ValidationError::MissingImage.into();
        assert!(matches!(err, IcebotError::Validation(ValidationError::MissingImage)));
        assert!(!err.is_upstream());
        assert_eq!(err.to_string(), "validation failed: No image provided");
    }
}

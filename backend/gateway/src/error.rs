//! Maps domain errors onto HTTP responses.
//!
//! Validation failures carry their specific message to the caller. Network
//! and upstream failures are logged with their cause and answered with a
//! generic retry message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use icebot_core::IcebotError;

/// What the caller was trying to do, for the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAction {
    Generate,
    Enhance,
    Profile,
    Analyze,
    Store,
}

impl FailedAction {
    fn message(self) -> &'static str {
        match self {
            Self::Generate => "Failed to generate message. Please try again.",
            Self::Enhance => "Failed to enhance message. Please try again.",
            Self::Profile => "Failed to generate profile. Please try again.",
            Self::Analyze => "Failed to analyze image. Please try again.",
            Self::Store => "Failed to save changes. Please try again.",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn from_icebot(err: IcebotError, action: FailedAction) -> Self {
        match err {
            IcebotError::Validation(v) => Self::new(StatusCode::BAD_REQUEST, v.to_string()),
            IcebotError::NotFound(what) => Self::new(StatusCode::NOT_FOUND, format!("Not found: {what}")),
            e if e.is_upstream() => {
                error!(error = %e, ?action, "Upstream call failed");
                Self::new(StatusCode::BAD_GATEWAY, action.message())
            }
            e => {
                error!(error = %e, ?action, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, action.message())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Attach a [`FailedAction`] to a domain result.
pub trait ResultExt<T> {
    fn or_api(self, action: FailedAction) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, IcebotError> {
    fn or_api(self, action: FailedAction) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_icebot(e, action))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IcebotError;
use crate::types::{CompletionRequest, CompletionResult};

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name (e.g., "openrouter", "mock").
    fn name(&self) -> &str;

    /// Run one completion and return the first choice's text, untouched.
    async fn execute(&self, request: &CompletionRequest) -> Result<CompletionResult, IcebotError>;
}

/// One piece of user feedback on a generated message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub message: String,
    pub was_regenerated: bool,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(message: impl Into<String>, was_regenerated: bool) -> Self {
        Self {
            message: message.into(),
            was_regenerated,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, append-only logs of feedback and of responses already shown.
///
/// Both logs evict their oldest entry once full.
#[async_trait]
pub trait ResponseLog: Send + Sync {
    async fn record_feedback(&self, entry: FeedbackEntry) -> Result<(), IcebotError>;

    async fn record_used_response(&self, response: &str) -> Result<(), IcebotError>;

    /// Oldest first.
    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, IcebotError>;

    /// Oldest first.
    async fn used_responses(&self) -> Result<Vec<String>, IcebotError>;
}

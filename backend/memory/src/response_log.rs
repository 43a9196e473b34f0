use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use icebot_core::{FeedbackEntry, IcebotError, ResponseLog};

pub const DEFAULT_USED_RESPONSES_CAP: usize = 100;
pub const DEFAULT_FEEDBACK_CAP: usize = 1000;

/// Capacity of the two bounded logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCaps {
    pub used_responses: usize,
    pub feedback: usize,
}

impl Default for LogCaps {
    fn default() -> Self {
        Self {
            used_responses: DEFAULT_USED_RESPONSES_CAP,
            feedback: DEFAULT_FEEDBACK_CAP,
        }
    }
}

/// Append `item` and evict from the front until `cap` holds.
pub(crate) fn push_bounded<T>(log: &mut VecDeque<T>, item: T, cap: usize) {
    log.push_back(item);
    while log.len() > cap {
        log.pop_front();
    }
}

/// Process-local response log. Lost on restart.
pub struct InMemoryResponseLog {
    caps: LogCaps,
    feedback: RwLock<VecDeque<FeedbackEntry>>,
    used_responses: RwLock<VecDeque<String>>,
}

impl Default for InMemoryResponseLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResponseLog {
    pub fn new() -> Self {
        Self::with_caps(LogCaps::default())
    }

    pub fn with_caps(caps: LogCaps) -> Self {
        Self {
            caps,
            feedback: RwLock::new(VecDeque::new()),
            used_responses: RwLock::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl ResponseLog for InMemoryResponseLog {
    async fn record_feedback(&self, entry: FeedbackEntry) -> Result<(), IcebotError> {
        let mut feedback = self.feedback.write().await;
        push_bounded(&mut feedback, entry, self.caps.feedback);
        Ok(())
    }

    async fn record_used_response(&self, response: &str) -> Result<(), IcebotError> {
        let mut used = self.used_responses.write().await;
        push_bounded(&mut used, response.to_string(), self.caps.used_responses);
        Ok(())
    }

    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, IcebotError> {
        Ok(self.feedback.read().await.iter().cloned().collect())
    }

    async fn used_responses(&self) -> Result<Vec<String>, IcebotError> {
        Ok(self.used_responses.read().await.iter().cloned().collect())
    }
}

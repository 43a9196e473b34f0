//! Generation Event Logger
//!
//! Structured events (completion, failure, feedback) emitted under the
//! `icebot_events` target, which the file layer writes as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

pub const EVENT_TARGET: &str = "icebot_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    Completion {
        task: String,
        model: String,
        tokens_used: u64,
        latency_ms: u64,
    },
    Failure {
        task: String,
        error_msg: String,
    },
    Feedback {
        message: String,
        was_regenerated: bool,
    },
}

impl GenerationEvent {
    fn redacted(mut self) -> Self {
        match &mut self {
            Self::Completion { .. } => {}
            Self::Failure { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            Self::Feedback { message, .. } => {
                *message = redact_sensitive_data(message);
            }
        }
        self
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: GenerationEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts the event and hands it to the tracing system.
    pub fn log_event(user_id: &str, event: GenerationEvent) {
        let entry = EventLogEntry {
            user_id: user_id.into(),
            timestamp: Utc::now(),
            event: event.redacted(),
        };

        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: EVENT_TARGET, event = %payload, "IceBot generation event");
    }
}

//! Structured logging for IceBot.
//!
//! Console and rolling NDJSON output, secret redaction, and generation events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, GenerationEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;

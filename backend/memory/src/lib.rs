pub mod conversations;
pub mod response_log;
pub mod sqlite_log;

pub use conversations::{ConversationStore, InMemoryConversationStore};
pub use response_log::{InMemoryResponseLog, LogCaps, DEFAULT_FEEDBACK_CAP, DEFAULT_USED_RESPONSES_CAP};
pub use sqlite_log::SqliteResponseLog;

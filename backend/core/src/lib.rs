pub mod conversation;
pub mod error;
pub mod style;
pub mod traits;
pub mod types;

pub use conversation::{ChatMessage, Conversation, SavedMessage};
pub use error::{IcebotError, ValidationError};
pub use style::{StyleFlags, StyleMode, StyleSelection, Tone};
pub use traits::{CompletionClient, FeedbackEntry, ResponseLog};
pub use types::{
    CompletionRequest, CompletionResult, ProfileBrief, ProfileLength, ProfileTone, ProfileTrait,
    SamplingParams, TaskKind, UserContent,
};

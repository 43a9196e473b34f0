pub mod composer;
pub mod normalizer;
pub mod persona;
pub mod providers;
pub mod service;
pub mod styles;

pub use composer::{PromptComposer, PromptInput, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};
pub use normalizer::normalize;
pub use persona::PromptPersona;
pub use providers::{MockClient, MockReply, OpenRouterClient};
pub use service::{execute_logged, IceBot, CONVERSATION_STYLE};

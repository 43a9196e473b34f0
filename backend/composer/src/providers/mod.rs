pub mod mock;
pub mod openrouter;

pub use mock::{MockClient, MockReply};
pub use openrouter::OpenRouterClient;

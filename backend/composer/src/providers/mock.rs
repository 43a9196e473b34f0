use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use icebot_core::{CompletionClient, CompletionRequest, CompletionResult, IcebotError};

/// One scripted outcome for [`MockClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    EmptyResponse,
    Transport(String),
    Upstream {
        status_code: u16,
        message: Option<String>,
    },
}

impl MockReply {
    fn into_result(self, request: &CompletionRequest) -> Result<CompletionResult, IcebotError> {
        match self {
            Self::Text(raw_text) => Ok(CompletionResult {
                raw_text,
                model: request.model.clone(),
                tokens_used: 0,
                latency_ms: 0,
            }),
            Self::EmptyResponse => Err(IcebotError::EmptyResponse),
            Self::Transport(cause) => Err(IcebotError::Transport(cause)),
            Self::Upstream {
                status_code,
                message,
            } => Err(IcebotError::Upstream {
                status_code,
                message,
            }),
        }
    }
}

/// A completion client that replays scripted replies and records every request.
///
/// Once the script runs out, the fallback reply is returned.
pub struct MockClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::Text("Mock response".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`.
    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        self.fallback = MockReply::Text(text.into());
        self
    }

    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Queue a reply ahead of the fallback.
    pub fn then(self, reply: MockReply) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, request: &CompletionRequest) -> Result<CompletionResult, IcebotError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let reply = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icebot_core::{TaskKind, UserContent};

    fn request() -> CompletionRequest {
        CompletionRequest::new(TaskKind::Enhancement, "m", "s", UserContent::Text("hi".into()))
    }

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let client = MockClient::new()
            .with_response("fallback")
            .then(MockReply::Text("first".into()))
            .then(MockReply::EmptyResponse);

        assert_eq!(client.execute(&request()).await.unwrap().raw_text, "first");
        assert!(matches!(
            client.execute(&request()).await,
            Err(IcebotError::EmptyResponse)
        ));
        assert_eq!(client.execute(&request()).await.unwrap().raw_text, "fallback");
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.requests()[0].task, TaskKind::Enhancement);
    }
}

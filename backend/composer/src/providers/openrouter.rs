use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use icebot_core::{CompletionClient, CompletionRequest, CompletionResult, IcebotError, UserContent};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest upstream error body kept verbatim when it is not JSON.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// OpenRouter.ai chat-completions client.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    site_url: String,
    site_name: String,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: "http://localhost:3000".to_string(),
            site_name: "IceBot".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Identification sent as `HTTP-Referer` and `X-Title`.
    pub fn with_site(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.site_url = url.into();
        self.site_name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
    error: Option<Value>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

impl<'a> ChatRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(&request.system_prompt),
            });
        }
        let content = match &request.user_content {
            UserContent::Text(text) => MessageContent::Text(text),
            UserContent::TextWithImage { text, image_url } => MessageContent::Parts(vec![
                ContentPart::Text { text },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: image_url },
                },
            ]),
        };
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        Self {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
        }
    }
}

/// Pull a human-readable message out of an upstream error body.
fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = error_message(&json["error"]) {
            return Some(message);
        }
    }
    Some(body.chars().take(MAX_ERROR_BODY_CHARS).collect())
}

fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn execute(&self, request: &CompletionRequest) -> Result<CompletionResult, IcebotError> {
        let start = Instant::now();
        let body = ChatRequest::from_request(request);

        debug!(
            task = %request.task,
            model = %request.model,
            "Sending request to OpenRouter"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| IcebotError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IcebotError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "OpenRouter returned an error status");
            return Err(IcebotError::Upstream {
                status_code: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        let chat: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| IcebotError::MalformedResponse(e.to_string()))?;

        // OpenRouter can report provider failures inside a 200 body.
        if let Some(error) = chat.error.as_ref().filter(|e| !e.is_null()) {
            let status_code = error
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(status.as_u16());
            return Err(IcebotError::Upstream {
                status_code,
                message: error_message(error),
            });
        }

        let raw_text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or(IcebotError::EmptyResponse)?;

        let tokens_used = chat.usage.and_then(|u| u.total_tokens).unwrap_or(0);
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(CompletionResult {
            raw_text,
            model: chat.model.unwrap_or_else(|| request.model.clone()),
            tokens_used,
            latency_ms,
        })
    }
}

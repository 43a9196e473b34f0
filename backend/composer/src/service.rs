//! The IceBot service: compose, execute, normalize, record.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use icebot_core::{
    ChatMessage, CompletionClient, CompletionRequest, CompletionResult, Conversation,
    FeedbackEntry, IcebotError, ProfileBrief, ResponseLog, StyleFlags, StyleMode,
    ValidationError,
};
use icebot_logging::{EventLogger, GenerationEvent};

use crate::composer::{PromptComposer, PromptInput};
use crate::normalizer::normalize;

/// Styles used when replying inside a simulated conversation.
pub const CONVERSATION_STYLE: [StyleMode; 2] = [StyleMode::Funny, StyleMode::Flirty];

pub struct IceBot {
    client: Arc<dyn CompletionClient>,
    composer: PromptComposer,
    log: Arc<dyn ResponseLog>,
}

impl IceBot {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        composer: PromptComposer,
        log: Arc<dyn ResponseLog>,
    ) -> Self {
        Self {
            client,
            composer,
            log,
        }
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn client(&self) -> Arc<dyn CompletionClient> {
        Arc::clone(&self.client)
    }

    pub fn response_log(&self) -> Arc<dyn ResponseLog> {
        Arc::clone(&self.log)
    }

    /// Execute one request and return the normalized text.
    async fn complete(&self, user_id: &str, request: CompletionRequest) -> Result<String, IcebotError> {
        let task = request.task;
        let result = execute_logged(self.client.as_ref(), user_id, &request).await?;

        let text = normalize(&result.raw_text);
        if text.is_empty() {
            debug!(task = %task, "Normalized output was empty");
            return Err(IcebotError::EmptyResponse);
        }
        Ok(text)
    }

    pub async fn generate_ice_breaker(
        &self,
        user_id: &str,
        profile: &str,
        flags: &StyleFlags,
    ) -> Result<String, IcebotError> {
        let request = self.composer.compose(PromptInput::IceBreaker { profile, flags });
        let message = self.complete(user_id, request).await?;

        if let Err(e) = self.log.record_used_response(&message).await {
            warn!(error = %e, "Failed to record used response");
        }
        Ok(message)
    }

    pub async fn enhance_message(&self, user_id: &str, message: &str) -> Result<String, IcebotError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        let request = self.composer.compose(PromptInput::Enhancement { message });
        self.complete(user_id, request).await
    }

    pub async fn generate_profile(&self, user_id: &str, brief: &ProfileBrief) -> Result<String, IcebotError> {
        let request = self.composer.compose(PromptInput::Profile(brief));
        self.complete(user_id, request).await
    }

    /// Answer the match's most recent message. The caller stores the reply.
    pub async fn reply_to_conversation(
        &self,
        user_id: &str,
        conversation: &Conversation,
    ) -> Result<ChatMessage, IcebotError> {
        let last = conversation
            .last_match_message()
            .ok_or(ValidationError::NoMatchMessage)?;
        let flags = StyleFlags::with_modes(CONVERSATION_STYLE);
        let text = self.generate_ice_breaker(user_id, last, &flags).await?;
        Ok(ChatMessage::generated(text))
    }

    /// Produce a replacement for the reply `message_id`.
    ///
    /// The old text is recorded as regenerated feedback before the new one is
    /// requested. The conversation itself is never modified here.
    pub async fn regenerate_reply(
        &self,
        user_id: &str,
        conversation: &Conversation,
        message_id: Uuid,
    ) -> Result<String, IcebotError> {
        let old = own_message(conversation, message_id)?;
        let prompt = conversation
            .match_message_before(message_id)
            .ok_or(ValidationError::NoPreviousMessage)?;

        self.record_feedback(user_id, &old.text, true).await;

        let flags = StyleFlags::with_modes(CONVERSATION_STYLE);
        self.generate_ice_breaker(user_id, prompt, &flags).await
    }

    /// Rewrite one of the user's own messages. The conversation itself is
    /// never modified here.
    pub async fn enhance_in_conversation(
        &self,
        user_id: &str,
        conversation: &Conversation,
        message_id: Uuid,
    ) -> Result<String, IcebotError> {
        let message = own_message(conversation, message_id)?;
        self.enhance_message(user_id, &message.text).await
    }

    /// Best effort: a storage failure is logged, never surfaced.
    pub async fn record_feedback(&self, user_id: &str, message: &str, was_regenerated: bool) {
        EventLogger::log_event(
            user_id,
            GenerationEvent::Feedback {
                message: message.to_string(),
                was_regenerated,
            },
        );
        if let Err(e) = self
            .log
            .record_feedback(FeedbackEntry::new(message, was_regenerated))
            .await
        {
            warn!(error = %e, "Failed to record feedback");
        }
    }
}

/// Run one completion, logging the outcome and emitting a completion or
/// failure [`GenerationEvent`] for `user_id`.
pub async fn execute_logged(
    client: &dyn CompletionClient,
    user_id: &str,
    request: &CompletionRequest,
) -> Result<CompletionResult, IcebotError> {
    let task = request.task;
    match client.execute(request).await {
        Ok(result) => {
            info!(
                task = %task,
                model = %result.model,
                tokens = result.tokens_used,
                latency_ms = result.latency_ms,
                "Completion succeeded"
            );
            EventLogger::log_event(
                user_id,
                GenerationEvent::Completion {
                    task: task.to_string(),
                    model: result.model.clone(),
                    tokens_used: result.tokens_used,
                    latency_ms: result.latency_ms,
                },
            );
            Ok(result)
        }
        Err(e) => {
            warn!(task = %task, client = client.name(), error = %e, "Completion failed");
            EventLogger::log_event(
                user_id,
                GenerationEvent::Failure {
                    task: task.to_string(),
                    error_msg: e.to_string(),
                },
            );
            Err(e)
        }
    }
}

/// Look up `message_id`, refusing messages written by the match.
fn own_message(conversation: &Conversation, message_id: Uuid) -> Result<&ChatMessage, IcebotError> {
    let message = conversation
        .message(message_id)
        .ok_or_else(|| IcebotError::NotFound(format!("message {message_id}")))?;
    if message.is_match {
        return Err(ValidationError::NotOwnMessage.into());
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockClient, MockReply};
    use icebot_core::TaskKind;
    use icebot_memory::InMemoryResponseLog;

    fn bot(client: MockClient) -> (IceBot, Arc<MockClient>, Arc<InMemoryResponseLog>) {
        let client = Arc::new(client);
        let log = Arc::new(InMemoryResponseLog::new());
        let bot = IceBot::new(client.clone(), PromptComposer::default(), log.clone());
        (bot, client, log)
    }

    fn conversation() -> (Conversation, Uuid, Uuid) {
        let mut convo = Conversation::new("u1", "Alex");
        let opener = ChatMessage::generated("Hi! Love the hiking pics");
        let opener_id = opener.id;
        convo.push(opener);
        convo.push(ChatMessage::new("Thanks, do you climb?", true));
        let reply = ChatMessage::generated("Only the corporate ladder");
        let reply_id = reply.id;
        convo.push(reply);
        (convo, opener_id, reply_id)
    }

    #[tokio::test]
    async fn ice_breaker_is_normalized_and_recorded() {
        let (bot, client, log) = bot(MockClient::new().with_response(
            "\"Here's a message: Is that a golden retriever or a very fluffy sunbeam?\"",
        ));
        let flags = StyleFlags::with_modes([StyleMode::Funny]);

        let message = bot
            .generate_ice_breaker("u1", "Dog lover", &flags)
            .await
            .unwrap();
        assert_eq!(message, "Is that a golden retriever or a very fluffy sunbeam?");
        assert_eq!(log.used_responses().await.unwrap(), vec![message]);
        assert_eq!(client.requests()[0].task, TaskKind::IceBreaker);
    }

    #[tokio::test]
    async fn output_that_normalizes_to_nothing_is_empty_response() {
        let (bot, _, log) = bot(MockClient::new().with_response("  \"Message:\"  "));
        let err = bot
            .generate_ice_breaker("u1", "", &StyleFlags::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IcebotError::EmptyResponse));
        assert!(log.used_responses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_propagated_and_not_recorded() {
        let (bot, _, log) = bot(MockClient::new().with_fallback(MockReply::Upstream {
            status_code: 503,
            message: Some("overloaded".into()),
        }));
        let err = bot
            .generate_ice_breaker("u1", "x", &StyleFlags::new())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(log.used_responses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_enhancement_never_calls_the_client() {
        let (bot, client, _) = bot(MockClient::new());
        let err = bot.enhance_message("u1", "   ").await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::EmptyMessage)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn enhancement_uses_enhancement_task() {
        let (bot, client, _) = bot(MockClient::new().with_response("Do you like dogs?"));
        let text = bot.enhance_message("u1", "u like dogs").await.unwrap();
        assert_eq!(text, "Do you like dogs?");
        assert_eq!(client.requests()[0].task, TaskKind::Enhancement);
    }

    #[tokio::test]
    async fn profile_generation_uses_profile_task() {
        let (bot, client, _) = bot(MockClient::new().with_response("I collect passport stamps."));
        bot.generate_profile("u1", &ProfileBrief::default()).await.unwrap();
        assert_eq!(client.requests()[0].task, TaskKind::ProfileGeneration);
    }

    #[tokio::test]
    async fn reply_answers_latest_match_message_with_conversation_style() {
        let (bot, client, _) = bot(MockClient::new().with_response("Only rocks that text back."));
        let (convo, _, _) = conversation();

        let reply = bot.reply_to_conversation("u1", &convo).await.unwrap();
        assert!(reply.is_ai_generated);
        assert!(!reply.is_match);
        assert_eq!(reply.text, "Only rocks that text back.");

        let request = &client.requests()[0];
        let body = request.user_content.text();
        assert!(body.starts_with("Profile: Thanks, do you climb?"));
        assert!(body.contains("Selected Styles: Funny + Flirty\n"));
    }

    #[tokio::test]
    async fn reply_without_match_message_is_rejected() {
        let (bot, client, _) = bot(MockClient::new());
        let convo = Conversation::new("u1", "Sam");
        let err = bot.reply_to_conversation("u1", &convo).await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::NoMatchMessage)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn regenerate_records_old_text_as_feedback() {
        let (bot, client, log) = bot(MockClient::new().with_response("Only with a rope and a reason."));
        let (convo, _, reply_id) = conversation();

        let text = bot.regenerate_reply("u1", &convo, reply_id).await.unwrap();
        assert_eq!(text, "Only with a rope and a reason.");

        let feedback = log.feedback().await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].message, "Only the corporate ladder");
        assert!(feedback[0].was_regenerated);
        assert!(client.requests()[0]
            .user_content
            .text()
            .starts_with("Profile: Thanks, do you climb?"));
    }

    #[tokio::test]
    async fn regenerate_failure_leaves_no_used_response() {
        let (bot, _, log) = bot(MockClient::new().with_fallback(MockReply::Transport("reset".into())));
        let (convo, _, reply_id) = conversation();
        let before = convo.clone();

        let err = bot.regenerate_reply("u1", &convo, reply_id).await.unwrap_err();
        assert!(matches!(err, IcebotError::Transport(_)));
        assert_eq!(convo, before);
        assert!(log.used_responses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn regenerate_needs_a_previous_match_message() {
        let (bot, client, log) = bot(MockClient::new());
        let (convo, opener_id, _) = conversation();

        let err = bot.regenerate_reply("u1", &convo, opener_id).await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::NoPreviousMessage)
        ));
        assert_eq!(client.call_count(), 0);
        assert!(log.feedback().await.unwrap().is_empty());

        let err = bot
            .regenerate_reply("u1", &convo, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, IcebotError::NotFound(_)));
    }

    #[tokio::test]
    async fn match_messages_cannot_be_regenerated_or_enhanced() {
        let (bot, client, log) = bot(MockClient::new());
        let mut convo = Conversation::new("u1", "Alex");
        convo.push(ChatMessage::new("hey", true));
        let theirs = ChatMessage::new("how are you?", true);
        let theirs_id = theirs.id;
        convo.push(theirs);

        let err = bot.regenerate_reply("u1", &convo, theirs_id).await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::NotOwnMessage)
        ));
        let err = bot
            .enhance_in_conversation("u1", &convo, theirs_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::NotOwnMessage)
        ));
        assert_eq!(client.call_count(), 0);
        assert!(log.feedback().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn own_message_is_enhanced() {
        let (bot, client, _) = bot(MockClient::new().with_response("Do you climb often?"));
        let (convo, opener_id, _) = conversation();

        let text = bot
            .enhance_in_conversation("u1", &convo, opener_id)
            .await
            .unwrap();
        assert_eq!(text, "Do you climb often?");
        assert_eq!(client.requests()[0].task, TaskKind::Enhancement);
    }
}

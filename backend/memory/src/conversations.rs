use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use icebot_core::{ChatMessage, Conversation, IcebotError, SavedMessage};

/// Per-user persistence for simulated conversations and saved messages.
///
/// Every operation is scoped to `user_id`; a record owned by someone else is
/// reported as not found.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Conversations with an explicit order first (ascending), then newest first.
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, IcebotError>;

    async fn get_conversation(&self, user_id: &str, id: Uuid) -> Result<Conversation, IcebotError>;

    /// Start an empty conversation, placed after the existing ones.
    async fn add_conversation(&self, user_id: &str, name: &str) -> Result<Conversation, IcebotError>;

    /// Replace a stored conversation wholesale.
    async fn update_conversation(&self, conversation: Conversation) -> Result<(), IcebotError>;

    async fn delete_conversation(&self, user_id: &str, id: Uuid) -> Result<(), IcebotError>;

    /// Assign `order = index` to each id. Fails without changes if any id is unknown.
    async fn reorder_conversations(&self, user_id: &str, ids: &[Uuid]) -> Result<(), IcebotError>;

    async fn append_message(
        &self,
        user_id: &str,
        conversation_id: Uuid,
        message: ChatMessage,
    ) -> Result<Conversation, IcebotError>;

    /// Newest first.
    async fn list_saved(&self, user_id: &str) -> Result<Vec<SavedMessage>, IcebotError>;

    async fn add_saved(&self, user_id: &str, text: &str) -> Result<SavedMessage, IcebotError>;

    async fn delete_saved(&self, user_id: &str, id: Uuid) -> Result<(), IcebotError>;

    async fn set_saved_success(&self, user_id: &str, id: Uuid, success: bool) -> Result<(), IcebotError>;
}

fn conversation_not_found(id: Uuid) -> IcebotError {
    IcebotError::NotFound(format!("conversation {id}"))
}

fn saved_not_found(id: Uuid) -> IcebotError {
    IcebotError::NotFound(format!("saved message {id}"))
}

fn listing_order(a: &Conversation, b: &Conversation) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| b.timestamp.cmp(&a.timestamp)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.timestamp.cmp(&a.timestamp),
    }
}

/// Process-local store. Lost on restart.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<Uuid, Conversation>>,
    saved: RwLock<HashMap<Uuid, SavedMessage>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, IcebotError> {
        let conversations = self.conversations.read().await;
        let mut list: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(listing_order);
        Ok(list)
    }

    async fn get_conversation(&self, user_id: &str, id: Uuid) -> Result<Conversation, IcebotError> {
        self.conversations
            .read()
            .await
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned()
            .ok_or_else(|| conversation_not_found(id))
    }

    async fn add_conversation(&self, user_id: &str, name: &str) -> Result<Conversation, IcebotError> {
        let mut conversations = self.conversations.write().await;
        let existing = conversations.values().filter(|c| c.user_id == user_id).count();

        let mut conversation = Conversation::new(user_id, name);
        conversation.order = Some(existing as i64);
        conversations.insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn update_conversation(&self, mut conversation: Conversation) -> Result<(), IcebotError> {
        let mut conversations = self.conversations.write().await;
        match conversations.get_mut(&conversation.id) {
            Some(stored) if stored.user_id == conversation.user_id => {
                conversation.timestamp = Utc::now();
                *stored = conversation;
                Ok(())
            }
            _ => Err(conversation_not_found(conversation.id)),
        }
    }

    async fn delete_conversation(&self, user_id: &str, id: Uuid) -> Result<(), IcebotError> {
        let mut conversations = self.conversations.write().await;
        if !conversations.get(&id).is_some_and(|c| c.user_id == user_id) {
            return Err(conversation_not_found(id));
        }
        conversations.remove(&id);
        Ok(())
    }

    async fn reorder_conversations(&self, user_id: &str, ids: &[Uuid]) -> Result<(), IcebotError> {
        let mut conversations = self.conversations.write().await;
        if let Some(missing) = ids
            .iter()
            .find(|id| !conversations.get(*id).is_some_and(|c| c.user_id == user_id))
        {
            return Err(conversation_not_found(*missing));
        }

        let now = Utc::now();
        for (index, id) in ids.iter().enumerate() {
            if let Some(c) = conversations.get_mut(id) {
                c.order = Some(index as i64);
                c.timestamp = now;
            }
        }
        Ok(())
    }

    async fn append_message(
        &self,
        user_id: &str,
        conversation_id: Uuid,
        message: ChatMessage,
    ) -> Result<Conversation, IcebotError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&conversation_id)
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| conversation_not_found(conversation_id))?;
        conversation.push(message);
        Ok(conversation.clone())
    }

    async fn list_saved(&self, user_id: &str) -> Result<Vec<SavedMessage>, IcebotError> {
        let saved = self.saved.read().await;
        let mut list: Vec<SavedMessage> = saved
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(list)
    }

    async fn add_saved(&self, user_id: &str, text: &str) -> Result<SavedMessage, IcebotError> {
        let message = SavedMessage::new(user_id, text);
        self.saved.write().await.insert(message.id, message.clone());
        Ok(message)
    }

    async fn delete_saved(&self, user_id: &str, id: Uuid) -> Result<(), IcebotError> {
        let mut saved = self.saved.write().await;
        if !saved.get(&id).is_some_and(|m| m.user_id == user_id) {
            return Err(saved_not_found(id));
        }
        saved.remove(&id);
        Ok(())
    }

    async fn set_saved_success(&self, user_id: &str, id: Uuid, success: bool) -> Result<(), IcebotError> {
        let mut saved = self.saved.write().await;
        let message = saved
            .get_mut(&id)
            .filter(|m| m.user_id == user_id)
            .ok_or_else(|| saved_not_found(id))?;
        message.success = success;
        message.timestamp = Utc::now();
        Ok(())
    }
}

//! Records handed to the storage collaborator: simulated conversations and
//! saved messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a conversation, either from the match or from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub is_match: bool,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default)]
    pub is_ai_enhanced: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, is_match: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_match,
            is_ai_generated: false,
            is_ai_enhanced: false,
            timestamp: Utc::now(),
        }
    }

    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            is_ai_generated: true,
            ..Self::new(text, false)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub name: String,
    pub messages: Vec<ChatMessage>,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl Conversation {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            messages: Vec::new(),
            last_message: String::new(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            order: None,
            success: None,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.last_message = message.text.clone();
        self.timestamp = Utc::now();
        self.messages.push(message);
    }

    /// Replace the text of an existing message. Returns false if no message has `id`.
    pub fn replace_text(&mut self, id: Uuid, text: impl Into<String>, enhanced: bool) -> bool {
        let text = text.into();
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        message.text = text.clone();
        if enhanced {
            message.is_ai_enhanced = true;
        }
        self.last_message = text;
        self.timestamp = Utc::now();
        true
    }

    pub fn message(&self, id: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Text of the match's most recent message.
    pub fn last_match_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_match)
            .map(|m| m.text.as_str())
    }

    /// Text of the match's most recent message strictly before `id`.
    pub fn match_message_before(&self, id: Uuid) -> Option<&str> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        self.messages[..index]
            .iter()
            .rev()
            .find(|m| m.is_match)
            .map(|m| m.text.as_str())
    }
}

/// A generated message the user liked enough to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMessage {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub success: bool,
}

impl SavedMessage {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Conversation, Uuid) {
        let mut convo = Conversation::new("u1", "Alex");
        convo.push(ChatMessage::new("Hey there", true));
        convo.push(ChatMessage::generated("Hi! Love the hiking pics"));
        convo.push(ChatMessage::new("Thanks, do you climb?", true));
        let reply = ChatMessage::generated("Only the corporate ladder");
        let reply_id = reply.id;
        convo.push(reply);
        (convo, reply_id)
    }

    #[test]
    fn finds_last_match_message() {
        let (convo, _) = sample();
        assert_eq!(convo.last_match_message(), Some("Thanks, do you climb?"));
        assert_eq!(convo.last_message, "Only the corporate ladder");
    }

    #[test]
    fn finds_match_message_before_reply() {
        let (convo, reply_id) = sample();
        let first_reply = convo.messages[1].id;
        assert_eq!(convo.match_message_before(reply_id), Some("Thanks, do you climb?"));
        assert_eq!(convo.match_message_before(first_reply), Some("Hey there"));
        assert_eq!(convo.match_message_before(convo.messages[0].id), None);
        assert_eq!(convo.match_message_before(Uuid::new_v4()), None);
    }

    #[test]
    fn replace_text_marks_enhanced() {
        let (mut convo, reply_id) = sample();
        assert!(convo.replace_text(reply_id, "Only ladders with a view", true));
        let msg = convo.message(reply_id).unwrap();
        assert!(msg.is_ai_enhanced);
        assert_eq!(convo.last_message, "Only ladders with a view");
        assert!(!convo.replace_text(Uuid::new_v4(), "nope", false));
    }

    #[test]
    fn empty_conversation_has_no_match_message() {
        let convo = Conversation::new("u1", "Sam");
        assert!(convo.last_match_message().is_none());
    }
}

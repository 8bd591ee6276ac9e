//! Conversation message model.
//!
//! A [`Message`] is created for every user send and every bot reply (the
//! fallback included). Messages are immutable once appended to a widget's log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique message identifier.
pub type MessageId = Uuid;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The website visitor.
    User,
    /// The hotel assistant (remote chat API or the widget itself).
    Bot,
}

impl Sender {
    /// CSS-friendly name of the sender.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// A single entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Who wrote the message.
    pub sender: Sender,
    /// Text shown in the bubble.
    pub text: String,
    /// Suggested replies rendered as buttons under the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message typed by the visitor.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into(), None)
    }

    /// Create a bot message with optional quick replies.
    #[must_use]
    pub fn bot(text: impl Into<String>, quick_replies: Option<Vec<String>>) -> Self {
        Self::new(Sender::Bot, text.into(), quick_replies)
    }

    fn new(sender: Sender, text: String, quick_replies: Option<Vec<String>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text,
            quick_replies,
            created_at: Utc::now(),
        }
    }

    /// Quick replies to render, empty when the message has none.
    #[must_use]
    pub fn quick_replies(&self) -> &[String] {
        self.quick_replies.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_quick_replies() {
        let msg = Message::user("Bonjour");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "Bonjour");
        assert!(msg.quick_replies.is_none());
        assert!(msg.quick_replies().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::bot("a", None);
        let b = Message::bot("a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization_shape() {
        let msg = Message::bot("Hi", Some(vec!["A".into(), "B".into()]));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["text"], "Hi");
        assert_eq!(json["quick_replies"], serde_json::json!(["A", "B"]));

        let plain = serde_json::to_value(Message::user("x")).unwrap();
        assert!(plain.get("quick_replies").is_none());
    }
}

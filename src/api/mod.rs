//! Remote chat API: wire types, errors and the client trait.
//!
//! The widget only ever talks to the API through [`ChatApi`], so tests can swap
//! the HTTP client for an in-memory double.
//!
//! # Wire format
//!
//! ```text
//! POST /api/chat
//! {"message": "Horaires", "user_id": "user"}
//!
//! 200 OK
//! {"response": {"content": "9h-18h", "quick_replies": ["Réserver"]}}
//! ```

pub mod http;

pub use http::HttpChatApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Path of the chat endpoint, relative to the API base URL.
pub const CHAT_PATH: &str = "/api/chat";

/// Session identifier sent with every request.
pub const DEFAULT_USER_ID: &str = "user";

/// Body of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Text typed (or quick reply clicked) by the visitor.
    pub message: String,
    /// Fixed session identifier.
    pub user_id: String,
}

/// Body of a successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The bot's reply.
    pub response: BotReply,
}

/// The bot's textual reply and its suggested follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    /// Reply text.
    pub content: String,
    /// Optional quick replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
}

/// Failure of a chat request.
///
/// The widget treats every variant the same way; the split only exists so the
/// HTTP client can be tested and traced precisely.
#[derive(Debug, thiserror::Error)]
pub enum ChatApiError {
    /// Transport-level failure (connection refused, reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The body did not match the expected schema.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the remote chat API.
#[async_trait]
pub trait ChatApi: Send + Sync + std::fmt::Debug {
    /// Send one message and wait for the bot's reply.
    async fn send(&self, request: &ChatRequest) -> Result<BotReply, ChatApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_snake_case_user_id() {
        let req = ChatRequest {
            message: "Hours".into(),
            user_id: DEFAULT_USER_ID.into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"message": "Hours", "user_id": "user"})
        );
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let body = json!({
            "response": {"content": "Salut", "quick_replies": ["A"], "type": "ai"}
        });
        let parsed: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.response.content, "Salut");
        assert_eq!(parsed.response.quick_replies, Some(vec!["A".to_string()]));
    }

    #[test]
    fn test_response_without_quick_replies() {
        let parsed: ChatResponse =
            serde_json::from_value(json!({"response": {"content": "ok"}})).unwrap();
        assert!(parsed.response.quick_replies.is_none());
    }

    #[test]
    fn test_response_missing_content_is_rejected() {
        let parsed = serde_json::from_value::<ChatResponse>(json!({"response": {}}));
        assert!(parsed.is_err());
    }
}

//! reqwest implementation of [`ChatApi`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{BotReply, CHAT_PATH, ChatApi, ChatApiError, ChatRequest, ChatResponse};

/// HTTP client for the remote chat API.
///
/// # Example
///
/// ```rust,no_run
/// use holiday_chat_widget::api::{ChatApi, ChatRequest, HttpChatApi};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpChatApi::new("http://localhost:5000", None)?;
/// let reply = api
///     .send(&ChatRequest { message: "Horaires".into(), user_id: "user".into() })
///     .await?;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpChatApi {
    /// Create a client for the API at `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self, ChatApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(base_url, builder.build()?)
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, ChatApiError> {
        let endpoint = Url::parse(base_url.as_ref())?.join(CHAT_PATH)?;
        Ok(Self { endpoint, http })
    }

    /// Full URL of the chat endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send(&self, request: &ChatRequest) -> Result<BotReply, ChatApiError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(name: "chat_api.status", status = status.as_u16(), "Chat API returned an error status");
            return Err(ChatApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Ok(parsed.response)
    }
}

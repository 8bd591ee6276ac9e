//! The chat widget and its per-session store.
//!
//! # Architecture
//!
//! - [`WidgetState`]: pure state machine (visibility, log, pending input)
//! - [`ChatWidget`]: shared handle that runs the send cycle against a [`ChatApi`]
//! - [`WidgetStore`]: one widget per browser session
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use holiday_chat_widget::api::HttpChatApi;
//! use holiday_chat_widget::locale::WidgetStrings;
//! use holiday_chat_widget::widget::ChatWidget;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpChatApi::new("http://localhost:5000", None)?);
//! let widget = ChatWidget::new(api, "user", WidgetStrings::default());
//!
//! widget.open();
//! widget.set_input_text("Horaires");
//! widget.send(None).await;
//!
//! assert_eq!(widget.messages().len(), 3);
//! # Ok(())
//! # }
//! ```

mod state;
mod store;

pub use state::{SendOutcome, WidgetState};
pub use store::{DEFAULT_WIDGET_TIMEOUT, WidgetStore};

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::ChatApi;
use crate::locale::WidgetStrings;
use crate::message::Message;

/// Shared handle to one widget instance.
///
/// Clones refer to the same state. Sends are fire-and-forget: several may be
/// pending at once and their replies are appended in completion order, which
/// need not match the order they were issued in.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

#[derive(Debug)]
struct WidgetInner {
    state: RwLock<WidgetState>,
    api: Arc<dyn ChatApi>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl ChatWidget {
    /// Create a closed widget talking to `api`.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApi>, user_id: impl Into<String>, strings: WidgetStrings) -> Self {
        Self {
            inner: Arc::new(WidgetInner {
                state: RwLock::new(WidgetState::new(user_id, strings)),
                api,
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, WidgetState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WidgetState> {
        self.touch();
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Show the panel, greeting on first open.
    pub fn open(&self) {
        self.write().open();
    }

    /// Hide the panel.
    pub fn close(&self) {
        self.write().close();
    }

    /// Flip visibility.
    pub fn toggle(&self) {
        self.write().toggle();
    }

    /// Replace the pending input buffer.
    pub fn set_input_text(&self, text: impl Into<String>) {
        self.write().set_input_text(text);
    }

    /// Send `override_text`, or the pending input when `None`.
    ///
    /// The user message is appended and the input cleared before this returns;
    /// the returned future performs the request and appends the reply (or the
    /// fallback). Blank text, or a closed panel, resolves to
    /// [`SendOutcome::Skipped`] without touching the log.
    pub fn send(&self, override_text: Option<&str>) -> impl Future<Output = SendOutcome> + Send + use<> {
        let request = self.write().begin_send(override_text);
        let widget = self.clone();

        async move {
            let Some(request) = request else {
                return SendOutcome::Skipped;
            };

            debug!(
                name: "widget.send.issued",
                chars = request.message.chars().count(),
                "Chat request issued"
            );
            let result = widget.inner.api.send(&request).await;
            if let Err(e) = &result {
                debug!(name: "widget.send.fell_back", error = %e, "Chat request failed, using fallback");
            }

            let outcome = widget.write().complete_send(result);
            if outcome == SendOutcome::Replied {
                debug!(name: "widget.send.replied", "Chat reply appended");
            }
            outcome
        }
    }

    /// Equivalent to `send(Some(reply))`.
    pub fn click_quick_reply(&self, reply: &str) -> impl Future<Output = SendOutcome> + Send + use<> {
        self.send(Some(reply))
    }

    /// Run [`ChatWidget::send`] on the tokio runtime without waiting for it.
    ///
    /// The user message is already in the log when this returns.
    pub fn spawn_send(&self, override_text: Option<&str>) -> JoinHandle<SendOutcome> {
        tokio::spawn(self.send(override_text))
    }

    /// Whether the panel is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.read().is_visible()
    }

    /// Snapshot of the conversation log.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.read().messages().to_vec()
    }

    /// Current pending input.
    #[must_use]
    pub fn pending_input(&self) -> String {
        self.read().pending_input().to_owned()
    }

    /// Number of requests still awaiting a reply.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.read().in_flight()
    }

    /// Snapshot of the whole state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WidgetState {
        self.read().clone()
    }

    /// Time of the last state change.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

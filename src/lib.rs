//! Holiday Beach chat widget
//!
//! An embeddable chat widget for the hotel website: a floating toggle button,
//! an expandable message panel, and a send/receive cycle against a remote chat
//! API that answers with text and optional quick replies.
//!
//! # Architecture
//!
//! - **Widget**: synchronous state machine plus an async send cycle
//! - **Chat API**: `POST /api/chat` client behind a trait
//! - **Render**: server-side HTML fragment driven by HTMX
//! - **Server**: Axum host keeping one widget per browser session
//!
//! # Modules
//!
//! - [`api`]: Chat API trait, wire types and reqwest client
//! - [`widget`]: Widget state, shared handle and per-session store
//! - [`message`]: Conversation message model
//! - [`render`]: HTML rendering
//! - [`locale`]: Hard-coded widget strings

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod locale;
pub mod message;
pub mod render;
pub mod server;
pub mod widget;

use crate::api::ChatApi;
use crate::config::AppConfig;

use std::sync::Arc;
use widget::WidgetStore;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Live widget instances.
    pub widgets: WidgetStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state, with every widget talking to `api`.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApi>, config: Arc<AppConfig>) -> Self {
        let widgets = WidgetStore::new(
            api,
            config.chat_api.user_id.clone(),
            config.widget.strings(),
        );
        Self { widgets, config }
    }
}

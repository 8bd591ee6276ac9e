//! Per-session widget storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use super::ChatWidget;
use crate::api::ChatApi;
use crate::locale::WidgetStrings;

/// Default idle time after which a widget is torn down (30 minutes).
pub const DEFAULT_WIDGET_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Thread-safe store of widget instances keyed by session id.
///
/// Removing a widget is its teardown: its conversation log is gone with it.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    inner: Arc<WidgetStoreInner>,
}

#[derive(Debug)]
struct WidgetStoreInner {
    widgets: RwLock<HashMap<String, ChatWidget>>,
    api: Arc<dyn ChatApi>,
    user_id: String,
    strings: WidgetStrings,
}

impl WidgetStore {
    /// Create an empty store whose widgets talk to `api`.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApi>, user_id: impl Into<String>, strings: WidgetStrings) -> Self {
        Self {
            inner: Arc::new(WidgetStoreInner {
                widgets: RwLock::new(HashMap::new()),
                api,
                user_id: user_id.into(),
                strings,
            }),
        }
    }

    /// Create a widget under a fresh id.
    #[must_use]
    pub fn create(&self) -> (String, ChatWidget) {
        let id = Uuid::new_v4().to_string();
        let widget = self.create_with_id(&id);
        (id, widget)
    }

    fn create_with_id(&self, id: &str) -> ChatWidget {
        let widget = ChatWidget::new(
            Arc::clone(&self.inner.api),
            self.inner.user_id.clone(),
            self.inner.strings.clone(),
        );
        let mut guard = self
            .inner
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(id.to_owned()).or_insert(widget).clone()
    }

    /// Get a widget by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ChatWidget> {
        let guard = self
            .inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Get a widget by id, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> ChatWidget {
        if let Some(widget) = self.get(id) {
            return widget;
        }
        self.create_with_id(id)
    }

    /// Tear down a widget.
    pub fn remove(&self, id: &str) -> Option<ChatWidget> {
        let mut guard = self
            .inner
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(id)
    }

    /// Number of live widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all widget ids.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Remove widgets idle for longer than `timeout`.
    ///
    /// Returns the number of widgets removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let now = Utc::now();
        let mut guard = self
            .inner
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, widget| {
            // Clock skew (activity in the future) keeps the widget.
            !(now - widget.last_activity())
                .to_std()
                .is_ok_and(|idle| idle > timeout)
        });
        before - guard.len()
    }
}

//! Synchronous widget state machine.
//!
//! [`WidgetState`] owns visibility, the conversation log and the pending input.
//! It never performs I/O: a send is split into [`WidgetState::begin_send`],
//! which records the user message and hands back the request to issue, and
//! [`WidgetState::complete_send`], which appends the reply or the fallback.

use crate::api::{BotReply, ChatApiError, ChatRequest};
use crate::locale::WidgetStrings;
use crate::message::Message;

/// Result of a finished send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing sent: the effective text was blank or the panel is closed.
    Skipped,
    /// The API replied and its message was appended.
    Replied,
    /// The API call failed and the fallback message was appended.
    FellBack,
}

/// Visibility, log and input buffer of one widget instance.
#[derive(Debug, Clone)]
pub struct WidgetState {
    visible: bool,
    log: Vec<Message>,
    pending_input: String,
    in_flight: usize,
    user_id: String,
    strings: WidgetStrings,
}

impl WidgetState {
    /// Closed widget with an empty log.
    #[must_use]
    pub fn new(user_id: impl Into<String>, strings: WidgetStrings) -> Self {
        Self {
            visible: false,
            log: Vec::new(),
            pending_input: String::new(),
            in_flight: 0,
            user_id: user_id.into(),
            strings,
        }
    }

    /// Show the panel, greeting the visitor if the log is still empty.
    pub fn open(&mut self) {
        self.visible = true;
        if self.log.is_empty() {
            self.log.push(Message::bot(
                self.strings.greeting.clone(),
                Some(self.strings.greeting_quick_replies.clone()),
            ));
        }
    }

    /// Hide the panel. The log is kept.
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    /// Replace the pending input buffer.
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Record a send and return the request to issue.
    ///
    /// Uses `override_text` when given, else the pending input. Returns `None`
    /// and leaves the state untouched when that text is blank or the panel is
    /// closed. Otherwise the user message is appended and the pending input
    /// cleared before returning.
    pub fn begin_send(&mut self, override_text: Option<&str>) -> Option<ChatRequest> {
        if !self.visible {
            return None;
        }
        let message = match override_text {
            Some(text) => text.to_owned(),
            None => self.pending_input.clone(),
        };
        if message.trim().is_empty() {
            return None;
        }

        self.log.push(Message::user(message.clone()));
        self.pending_input.clear();
        self.in_flight += 1;

        Some(ChatRequest {
            message,
            user_id: self.user_id.clone(),
        })
    }

    /// Append the bot message for a finished request.
    pub fn complete_send(&mut self, result: Result<BotReply, ChatApiError>) -> SendOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(reply) => {
                self.log.push(Message::bot(reply.content, reply.quick_replies));
                SendOutcome::Replied
            }
            Err(_) => {
                self.log.push(self.fallback_message());
                SendOutcome::FellBack
            }
        }
    }

    fn fallback_message(&self) -> Message {
        Message::bot(
            self.strings.fallback.clone(),
            Some(vec![self.strings.retry.clone()]),
        )
    }

    /// Whether the panel is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Conversation log in display order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    /// Current pending input.
    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Number of requests still awaiting a reply.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Strings this widget displays.
    #[must_use]
    pub fn strings(&self) -> &WidgetStrings {
        &self.strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{DEFAULT_SUPPORT_PHONE, Locale};
    use crate::message::Sender;

    fn english() -> WidgetState {
        WidgetState::new("user", WidgetStrings::for_locale(Locale::En, DEFAULT_SUPPORT_PHONE))
    }

    fn failure() -> ChatApiError {
        ChatApiError::Status {
            status: 500,
            body: String::new(),
        }
    }

    #[test]
    fn test_initially_closed_and_empty() {
        let state = english();
        assert!(!state.is_visible());
        assert!(state.messages().is_empty());
        assert_eq!(state.pending_input(), "");
    }

    #[test]
    fn test_open_greets_once() {
        let mut state = english();
        state.open();
        assert!(state.is_visible());
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].sender, Sender::Bot);
        assert_eq!(state.messages()[0].quick_replies().len(), 3);

        state.open();
        state.close();
        state.open();
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_close_keeps_log() {
        let mut state = english();
        state.open();
        state.close();
        assert!(!state.is_visible());
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut state = english();
        state.toggle();
        assert!(state.is_visible());
        state.toggle();
        assert!(!state.is_visible());
    }

    #[test]
    fn test_blank_sends_are_noops() {
        let mut state = english();
        state.open();
        assert!(state.begin_send(Some("")).is_none());
        assert!(state.begin_send(Some("   ")).is_none());
        state.set_input_text(" \t ");
        assert!(state.begin_send(None).is_none());
        assert_eq!(state.pending_input(), " \t ");
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn test_closed_widget_does_not_send() {
        let mut state = english();
        state.set_input_text("Hours");
        assert!(state.begin_send(None).is_none());
        assert!(state.messages().is_empty());
        assert_eq!(state.pending_input(), "Hours");
    }

    #[test]
    fn test_begin_send_uses_input_and_clears_it() {
        let mut state = english();
        state.open();
        state.set_input_text("Hours");
        let req = state.begin_send(None).unwrap();
        assert_eq!(req.message, "Hours");
        assert_eq!(req.user_id, "user");
        assert_eq!(state.pending_input(), "");
        assert_eq!(state.messages().last().unwrap().text, "Hours");
        assert_eq!(state.in_flight(), 1);
    }

    #[test]
    fn test_override_clears_unrelated_input() {
        let mut state = english();
        state.open();
        state.set_input_text("draft");
        let req = state.begin_send(Some("Book")).unwrap();
        assert_eq!(req.message, "Book");
        assert_eq!(state.pending_input(), "");
    }

    #[test]
    fn test_complete_send_success() {
        let mut state = english();
        state.open();
        state.begin_send(Some("hi")).unwrap();
        let outcome = state.complete_send(Ok(BotReply {
            content: "Hi".into(),
            quick_replies: Some(vec!["A".into(), "B".into()]),
        }));
        assert_eq!(outcome, SendOutcome::Replied);
        let last = state.messages().last().unwrap();
        assert_eq!(last.text, "Hi");
        assert_eq!(last.quick_replies(), ["A", "B"]);
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn test_complete_send_failure_appends_fallback() {
        let mut state = english();
        state.open();
        state.begin_send(Some("hi")).unwrap();
        let outcome = state.complete_send(Err(failure()));
        assert_eq!(outcome, SendOutcome::FellBack);
        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "Error. Contact: +216 75 758 063");
        assert_eq!(last.quick_replies(), ["Retry"]);
    }
}

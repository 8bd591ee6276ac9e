//! HTML rendering of the widget.
//!
//! The widget is rendered server-side as a single fragment rooted at
//! `#chat-widget`. Every control posts back to the host with HTMX and the
//! response replaces the whole fragment. The message list is the one part
//! that refreshes on its own.

use std::fmt::Write as _;

use crate::message::Message;
use crate::widget::WidgetState;

/// Delay before an open panel with pending requests refreshes itself.
pub const REFRESH_DELAY: &str = "1s";

/// Escape text for use in HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the widget fragment for session `id`.
///
/// A closed widget is only the floating toggle button. An open one is the
/// panel: header, message list with quick replies, input form.
#[must_use]
pub fn render_widget(id: &str, title: &str, state: &WidgetState) -> String {
    let id = escape_html(id);
    let strings = state.strings();

    if !state.is_visible() {
        return format!(
            r#"<div id="chat-widget" class="chat-widget" hx-target="this" hx-swap="outerHTML">
    <button class="chat-toggle" hx-post="/widget/{id}/open">{label}</button>
</div>"#,
            label = escape_html(&strings.toggle_label),
        );
    }

    format!(
        r#"<div id="chat-widget" class="chat-widget open" hx-target="this" hx-swap="outerHTML">
    <div class="chat-header">
        <h3>{title}</h3>
        <button class="chat-close" hx-post="/widget/{id}/close">×</button>
    </div>
    {messages}
    <form class="chat-input" hx-post="/widget/{id}/send">
        <input name="message" value="{pending}" placeholder="{placeholder}" autocomplete="off">
        <button type="submit" class="chat-send">➤</button>
    </form>
</div>"#,
        title = escape_html(title),
        messages = list(&id, state),
        pending = escape_html(state.pending_input()),
        placeholder = escape_html(&strings.input_placeholder),
    )
}

/// Render only the message list of session `id`.
///
/// While replies are outstanding the list polls and replaces itself, leaving
/// the input form (and whatever the visitor is typing) alone.
#[must_use]
pub fn render_messages(id: &str, state: &WidgetState) -> String {
    list(&escape_html(id), state)
}

// `id` is already escaped.
fn list(id: &str, state: &WidgetState) -> String {
    let refresh = if state.in_flight() > 0 {
        format!(r#" hx-get="/widget/{id}/messages" hx-trigger="load delay:{REFRESH_DELAY}""#)
    } else {
        String::new()
    };

    let mut messages = String::new();
    for message in state.messages() {
        render_message(&mut messages, id, message);
    }

    format!(
        r#"<div class="chat-messages" hx-target="this" hx-swap="outerHTML"{refresh}>
{messages}    </div>"#
    )
}

fn render_message(out: &mut String, id: &str, message: &Message) {
    let sender = message.sender.as_str();
    let _ = writeln!(
        out,
        r#"        <div class="chat-message {sender}" data-message-id="{message_id}">
            <div class="chat-bubble">{text}"#,
        message_id = message.id,
        text = escape_html(&message.text),
    );

    let replies = message.quick_replies();
    if !replies.is_empty() {
        out.push_str("                <div class=\"chat-quick-replies\">\n");
        for reply in replies {
            let vals = serde_json::json!({ "reply": reply }).to_string();
            let _ = writeln!(
                out,
                r##"                    <button class="chat-quick-reply" hx-post="/widget/{id}/quick-reply" hx-target="#chat-widget" hx-vals="{vals}">{label}</button>"##,
                vals = escape_html(&vals),
                label = escape_html(reply),
            );
        }
        out.push_str("                </div>\n");
    }

    out.push_str("            </div>\n        </div>\n");
}

/// Wrap a widget fragment in a host page loading HTMX from `htmx_src`.
#[must_use]
pub fn page(title: &str, htmx_src: &str, widget_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>

    <script src="{htmx_src}"></script>
    <link rel="stylesheet" href="/static/widget.css">
</head>
<body>
    <main>
        <h1>{title}</h1>
    </main>
    {widget_html}
</body>
</html>"#,
        title = escape_html(title),
        htmx_src = escape_html(htmx_src),
    )
}

//! HTTP host for the widget.
//!
//! Every `/widget/{id}/...` route mutates one widget instance and answers with
//! the re-rendered fragment, which HTMX swaps in place.

use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{delete, get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::api::{ChatApi, HttpChatApi};
use crate::config::AppConfig;
use crate::message::Message;
use crate::render::{page, render_messages, render_widget};
use crate::widget::{ChatWidget, WidgetStore};

/// Directory served under `/static`.
const STATIC_DIR: &str = "static";

/// Build the application state from configuration.
pub fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(
        &config.chat_api.base_url,
        config.chat_api.timeout(),
    )?);
    Ok(AppState::new(api, config))
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // HTML
        .route("/", get(index_handler))
        .route("/widget/{id}", get(widget_view))
        .route("/widget/{id}/messages", get(widget_messages))
        .route("/widget/{id}/open", post(widget_open))
        .route("/widget/{id}/close", post(widget_close))
        .route("/widget/{id}/toggle", post(widget_toggle))
        .route("/widget/{id}/send", post(widget_send))
        .route("/widget/{id}/quick-reply", post(widget_quick_reply))
        // JSON
        .route("/api/widget/{id}/messages", get(api_get_messages))
        .route("/api/widget/{id}", delete(api_delete_widget))
        .route("/health", get(health))
        // Static assets
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "chat_api.config.loaded",
        base_url = %config.chat_api.base_url,
        user_id = %config.chat_api.user_id,
        "Chat API configuration loaded"
    );

    check_htmx(&config.widget.htmx_src);

    let state = build_state(Arc::clone(&config))?;
    spawn_cleanup(state.widgets.clone(), &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %format!("http://{addr}"),
        "Server started"
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Warn when the page points at a local HTMX build that is not on disk.
fn check_htmx(src: &str) {
    let Some(rel) = src.strip_prefix("/static/") else {
        return;
    };
    if !FsPath::new(STATIC_DIR).join(rel).is_file() {
        warn!(
            name: "static.htmx.missing",
            path = %format!("{STATIC_DIR}/{rel}"),
            "HTMX script not found; widget controls will not respond (see README)"
        );
    }
}

/// Periodically tear down idle widgets.
fn spawn_cleanup(widgets: WidgetStore, config: &AppConfig) {
    let timeout = config.widget.session_timeout();
    let period = config.widget.cleanup_interval().max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    tokio::spawn(async move {
        loop {
            interval.tick().await;
            let removed = widgets.cleanup_expired_with_timeout(timeout);
            if removed > 0 {
                debug!(name: "widget.cleanup", removed, "Idle widgets removed");
            }
        }
    });
}

fn render(state: &AppState, id: &str, widget: &ChatWidget) -> Html<String> {
    Html(render_widget(id, &state.config.widget.title, &widget.snapshot()))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Host page with a fresh, closed widget.
async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (id, widget) = state.widgets.create();
    let fragment = render(&state, &id, &widget);
    Html(page(
        &state.config.widget.title,
        &state.config.widget.htmx_src,
        &fragment.0,
    ))
}

/// GET /widget/{id}
async fn widget_view(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let widget = state.widgets.get_or_create(&id);
    render(&state, &id, &widget)
}

/// GET /widget/{id}/messages - Message list only, polled while replies are pending.
async fn widget_messages(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let widget = state.widgets.get_or_create(&id);
    Html(render_messages(&id, &widget.snapshot()))
}

/// POST /widget/{id}/open
async fn widget_open(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let widget = state.widgets.get_or_create(&id);
    widget.open();
    render(&state, &id, &widget)
}

/// POST /widget/{id}/close
async fn widget_close(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let widget = state.widgets.get_or_create(&id);
    widget.close();
    render(&state, &id, &widget)
}

/// POST /widget/{id}/toggle
async fn widget_toggle(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let widget = state.widgets.get_or_create(&id);
    widget.toggle();
    render(&state, &id, &widget)
}

/// Widget behind a panel control.
///
/// The panel's controls are only shown while it is open, so a widget that was
/// torn down in the meantime comes back open and the send still goes through.
fn panel_widget(state: &AppState, id: &str) -> ChatWidget {
    if let Some(widget) = state.widgets.get(id) {
        return widget;
    }
    let widget = state.widgets.get_or_create(id);
    widget.open();
    info!(name: "widget.recreated", widget_id = %id, "Widget recreated from panel");
    widget
}

/// Input form body.
#[derive(Debug, Deserialize)]
struct SendForm {
    /// Text typed by the visitor.
    #[serde(default)]
    message: String,
}

/// Quick-reply button body.
#[derive(Debug, Deserialize)]
struct QuickReplyForm {
    /// Text of the clicked reply.
    reply: String,
}

/// POST /widget/{id}/send - Send the typed text.
///
/// Answers right away with the user message in place; the reply shows up on a
/// later refresh.
async fn widget_send(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SendForm>,
) -> Html<String> {
    let widget = panel_widget(&state, &id);
    widget.set_input_text(form.message);
    drop(widget.spawn_send(None));
    render(&state, &id, &widget)
}

/// POST /widget/{id}/quick-reply
async fn widget_quick_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<QuickReplyForm>,
) -> Html<String> {
    let widget = panel_widget(&state, &id);
    drop(widget.spawn_send(Some(&form.reply)));
    render(&state, &id, &widget)
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/widget/{id}/messages - Conversation log as JSON.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    state
        .widgets
        .get(&id)
        .map(|widget| Json(widget.messages()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// DELETE /api/widget/{id} - Tear the widget down.
async fn api_delete_widget(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.widgets.remove(&id).is_some() {
        info!(name: "widget.removed", widget_id = %id, "Widget torn down");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

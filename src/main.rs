//! Holiday Beach chat widget host
//!
//! Serves a demo page embedding the widget and drives it over HTMX.

use std::sync::Arc;

use dotenvy::dotenv;
use holiday_chat_widget::config::AppConfig;
use holiday_chat_widget::server;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let config = AppConfig::load()?;
    server::start_server(Arc::new(config)).await
}

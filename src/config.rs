//! Layered configuration.
//!
//! Priority, lowest first: built-in defaults, YAML file (`--config` /
//! `CONFIG_FILE`, else `./config.yaml` when present), `WIDGET_` environment
//! variables (`WIDGET_SERVER__PORT=8000`), then CLI flags.

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::api::DEFAULT_USER_ID;
use crate::locale::{DEFAULT_SUPPORT_PHONE, Locale, WidgetStrings};

/// Locally served HTMX build, expected under `static/vendor/`.
pub const DEFAULT_HTMX_SRC: &str = "/static/vendor/htmx-2.0.8.min.js";

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the remote chat API
    #[arg(long, env = "CHAT_API_URL")]
    pub chat_api_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chat_api: ChatApiConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatApiConfig {
    pub base_url: String,
    pub user_id: String,
    /// Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub locale: Locale,
    pub title: String,
    pub support_phone: String,
    pub session_timeout_secs: u64,
    pub cleanup_interval_secs: u64,
    /// Script URL the host page loads HTMX from.
    pub htmx_src: String,
}

impl ChatApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl WidgetConfig {
    /// Strings for the configured locale and support phone.
    #[must_use]
    pub fn strings(&self) -> WidgetStrings {
        WidgetStrings::for_locale(self.locale, &self.support_phone)
    }

    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("chat_api.base_url", "http://localhost:5000")?
            .set_default("chat_api.user_id", DEFAULT_USER_ID)?
            .set_default("widget.locale", "fr")?
            .set_default("widget.title", "Holiday Beach")?
            .set_default("widget.support_phone", DEFAULT_SUPPORT_PHONE)?
            .set_default("widget.session_timeout_secs", 30 * 60)?
            .set_default("widget.cleanup_interval_secs", 60)?
            .set_default("widget.htmx_src", DEFAULT_HTMX_SRC)?;

        // 2. Config file
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CWD_CONFIG_FILE, FileFormat::Yaml));
        }

        // 3. Environment (WIDGET_CHAT_API__BASE_URL, ...)
        builder = builder.add_source(
            Environment::with_prefix("WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env aliases)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.chat_api_url {
            builder = builder.set_override("chat_api.base_url", url)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_defaults() {
        let config = AppConfig::load_from_args([
            "holiday-chat-widget",
            "--port",
            "4100",
            "--chat-api-url",
            "http://bot.internal:5000",
        ])
        .unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.chat_api.base_url, "http://bot.internal:5000");
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let result = AppConfig::load_from_args(["holiday-chat-widget", "--nope"]);
        assert!(result.is_err());
    }
}

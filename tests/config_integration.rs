use holiday_chat_widget::config::{AppConfig, DEFAULT_HTMX_SRC};
use holiday_chat_widget::locale::Locale;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("WIDGET_SERVER__PORT");
        env::remove_var("WIDGET_CHAT_API__BASE_URL");
        env::remove_var("WIDGET_WIDGET__LOCALE");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("CHAT_API_URL");
    }
}

fn load() -> AppConfig {
    AppConfig::load_from_args(["holiday-chat-widget"]).expect("Failed to load config")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.chat_api.base_url, "http://localhost:5000");
    assert_eq!(config.chat_api.user_id, "user");
    assert!(config.chat_api.timeout().is_none());
    assert_eq!(config.widget.locale, Locale::Fr);
    assert_eq!(config.widget.title, "Holiday Beach");
    assert_eq!(config.widget.strings().retry, "Réessayer");
    assert_eq!(config.widget.htmx_src, DEFAULT_HTMX_SRC);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
        env::set_var("WIDGET_CHAT_API__BASE_URL", "http://bot:5000");
        env::set_var("WIDGET_WIDGET__LOCALE", "en");
    }

    let config = load();
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.chat_api.base_url, "http://bot:5000");
    assert_eq!(config.widget.strings().retry, "Retry");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_env_alias_beats_prefixed_env() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
        env::set_var("PORT", "8081");
    }

    let config = load();
    assert_eq!(config.server.port, 8081);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("widget.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
chat_api:
  timeout_secs: 15
widget:
  support_phone: "+216 00 000 000"
  htmx_src: "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"
"#,
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = load();
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.chat_api.timeout().map(|t| t.as_secs()), Some(15));
    assert_eq!(config.widget.strings().fallback, "Erreur. Contact: +216 00 000 000");
    assert_eq!(
        config.widget.htmx_src,
        "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"
    );
    // Untouched keys keep their defaults.
    assert_eq!(config.chat_api.base_url, "http://localhost:5000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let result = AppConfig::load_from_args(["holiday-chat-widget"]);

    fs::remove_file(cwd_path).unwrap();

    assert_eq!(result.expect("Failed to load config").server.port, 6060);
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["holiday-chat-widget", "--config", "/nonexistent/widget.yaml"]);
    assert!(result.is_err());
}

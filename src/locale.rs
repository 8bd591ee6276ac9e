//! Hard-coded widget strings.
//!
//! The widget ships in French (the hotel's site language) with an English
//! variant. Nothing here is translated at runtime.

use serde::Deserialize;

/// Default support phone number shown in the fallback message.
pub const DEFAULT_SUPPORT_PHONE: &str = "+216 75 758 063";

/// Language of the widget strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French (default).
    #[default]
    Fr,
    /// English.
    En,
}

/// Every piece of fixed text the widget displays or sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetStrings {
    /// Greeting injected on first open.
    pub greeting: String,
    /// Quick replies attached to the greeting.
    pub greeting_quick_replies: Vec<String>,
    /// Fallback error text, followed by the support phone.
    pub fallback: String,
    /// Single quick reply attached to the fallback.
    pub retry: String,
    /// Label of the floating toggle button.
    pub toggle_label: String,
    /// Placeholder of the input field.
    pub input_placeholder: String,
}

impl WidgetStrings {
    /// Strings for `locale`, with `support_phone` baked into the fallback.
    #[must_use]
    pub fn for_locale(locale: Locale, support_phone: &str) -> Self {
        match locale {
            Locale::Fr => Self {
                greeting: "Bienvenue ! Comment puis-je vous aider ?".into(),
                greeting_quick_replies: vec!["Réserver".into(), "Horaires".into(), "Contact".into()],
                fallback: format!("Erreur. Contact: {support_phone}"),
                retry: "Réessayer".into(),
                toggle_label: "💬 Assistant".into(),
                input_placeholder: "Votre message...".into(),
            },
            Locale::En => Self {
                greeting: "Welcome! How can I help you?".into(),
                greeting_quick_replies: vec!["Book".into(), "Hours".into(), "Contact".into()],
                fallback: format!("Error. Contact: {support_phone}"),
                retry: "Retry".into(),
                toggle_label: "💬 Assistant".into(),
                input_placeholder: "Your message...".into(),
            },
        }
    }
}

impl Default for WidgetStrings {
    fn default() -> Self {
        Self::for_locale(Locale::default(), DEFAULT_SUPPORT_PHONE)
    }
}

use crate::controller::{DEFAULT_RESET_ERROR, DEFAULT_SEND_ERROR, FallbackMessages};
use crate::types::ThemeMode;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_GREETING_DELAY_MS: u64 = 500;
const DEFAULT_TITLE: &str = "Asistente";

/// Runtime settings for the widget and the terminal client
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    pub base_url: String,
    /// Wait before asking for a greeting, on load and after a reset.
    pub greeting_delay: Duration,
    pub title: String,
    pub theme: ThemeMode,
    pub fallback: FallbackMessages,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            greeting_delay: Duration::from_millis(DEFAULT_GREETING_DELAY_MS),
            title: DEFAULT_TITLE.to_string(),
            theme: ThemeMode::Dark,
            fallback: FallbackMessages::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; unset keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let greeting_delay = match get("CHAT_GREETING_DELAY_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .with_context(|| format!("CHAT_GREETING_DELAY_MS is not a number: {raw}"))?,
            ),
            None => Duration::from_millis(DEFAULT_GREETING_DELAY_MS),
        };

        let theme = match get("CHAT_THEME") {
            Some(raw) => parse_theme(&raw)?,
            None => ThemeMode::Dark,
        };

        Ok(Self {
            base_url: get("CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            greeting_delay,
            title: get("CHAT_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            theme,
            fallback: FallbackMessages {
                send_error: get("CHAT_SEND_ERROR").unwrap_or_else(|| DEFAULT_SEND_ERROR.to_string()),
                reset_error: get("CHAT_RESET_ERROR")
                    .unwrap_or_else(|| DEFAULT_RESET_ERROR.to_string()),
            },
        })
    }
}

fn parse_theme(raw: &str) -> Result<ThemeMode> {
    match raw.to_ascii_lowercase().as_str() {
        "dark" => Ok(ThemeMode::Dark),
        "light" => Ok(ThemeMode::Light),
        other => Err(anyhow!("CHAT_THEME must be 'dark' or 'light', got '{other}'")),
    }
}

// ============================================
// Environment loading
// ============================================

/// Bundled config for builds that ship without a `.env` (mobile, web)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // A local .env wins during development
    if dotenvy::dotenv().is_ok() {
        return;
    }
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: called once at startup before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

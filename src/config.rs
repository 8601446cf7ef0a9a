//! Application Configuration
//!
//! Settings are baked in at build time from `PORTAL_*` environment variables
//! and fall back to development defaults.

use log::LevelFilter;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend root, no trailing slash
    pub api_base_url: String,
    /// Bearer token attached to every request when set
    pub auth_token: Option<String>,
    pub page_size: usize,
    /// Placeholder rows shown while a table loads
    pub skeleton_rows: usize,
    pub toast_timeout_ms: u32,
    /// Toasts kept on screen before the oldest is dropped
    pub toast_capacity: usize,
    pub log_level: LevelFilter,
    /// Records kept by the in-memory log buffer
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            auth_token: None,
            page_size: 10,
            skeleton_rows: 10,
            toast_timeout_ms: 4000,
            toast_capacity: 5,
            log_level: LevelFilter::Info,
            log_capacity: 500,
        }
    }
}

impl AppConfig {
    /// Configuration compiled into this build
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "PORTAL_API_URL" => option_env!("PORTAL_API_URL"),
                "PORTAL_AUTH_TOKEN" => option_env!("PORTAL_AUTH_TOKEN"),
                "PORTAL_PAGE_SIZE" => option_env!("PORTAL_PAGE_SIZE"),
                "PORTAL_SKELETON_ROWS" => option_env!("PORTAL_SKELETON_ROWS"),
                "PORTAL_TOAST_TIMEOUT_MS" => option_env!("PORTAL_TOAST_TIMEOUT_MS"),
                "PORTAL_TOAST_CAPACITY" => option_env!("PORTAL_TOAST_CAPACITY"),
                "PORTAL_LOG_LEVEL" => option_env!("PORTAL_LOG_LEVEL"),
                "PORTAL_LOG_CAPACITY" => option_env!("PORTAL_LOG_CAPACITY"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Build from an arbitrary key lookup; unparsable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = text("PORTAL_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let page_size: usize = parsed(&text, "PORTAL_PAGE_SIZE").filter(|n| *n > 0).unwrap_or(defaults.page_size);

        Self {
            api_base_url,
            auth_token: text("PORTAL_AUTH_TOKEN"),
            page_size,
            skeleton_rows: parsed(&text, "PORTAL_SKELETON_ROWS").unwrap_or(page_size),
            toast_timeout_ms: parsed(&text, "PORTAL_TOAST_TIMEOUT_MS").unwrap_or(defaults.toast_timeout_ms),
            toast_capacity: parsed(&text, "PORTAL_TOAST_CAPACITY").filter(|n| *n > 0).unwrap_or(defaults.toast_capacity),
            log_level: parsed(&text, "PORTAL_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_capacity: parsed(&text, "PORTAL_LOG_CAPACITY").filter(|n| *n > 0).unwrap_or(defaults.log_capacity),
        }
    }
}

fn parsed<T: std::str::FromStr>(text: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = text(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("[config] ignoring {key}={raw:?}");
            None
        }
    }
}

use std::time::Duration;

use serde::Deserialize;

use crate::hud::Shortcut;
use crate::net::ReconnectPolicy;
use crate::net::reconnect::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RECONNECT_DELAY};
use crate::settings::{Endpoint, SettingsDocument};

pub const DEFAULT_TOGGLE_SHORTCUT: &str = "Alt+O";
pub const DEFAULT_GREETING: &str = "overlay connected";

/// Client configuration, embedded from `web/overlay.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub websocket: WebSocketConfig,
    pub reconnect: ReconnectConfig,
    pub overlay: OverlayConfig,
    pub api: ApiConfig,
}

/// Address used when the settings document could not be fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        let endpoint = Endpoint::websocket_default();
        Self {
            host: endpoint.host,
            port: endpoint.port,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_RECONNECT_DELAY.as_millis() as u64,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub toggle_shortcut: String,
    /// Sent as `{"type": "hello", "message": ...}` after each open. Empty
    /// disables the greeting.
    pub greeting: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            toggle_shortcut: DEFAULT_TOGGLE_SHORTCUT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Settings backend origin; empty means the page's own origin.
    pub base_url: String,
}

impl ClientConfig {
    /// Parse TOML, falling back to defaults (with a warning) on error, then
    /// validate.
    pub fn from_toml_str(content: &str) -> Self {
        Self::parse(content).0
    }

    /// Like [`from_toml_str`](Self::from_toml_str), also returning one line
    /// per problem found, for callers with their own log sink.
    pub fn parse(content: &str) -> (Self, Vec<String>) {
        let mut problems = Vec::new();
        let mut config = match toml::from_str::<ClientConfig>(content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse client config: {e}, using defaults");
                problems.push(format!("config is not valid TOML, using defaults: {e}"));
                ClientConfig::default()
            },
        };
        problems.extend(config.validate());
        (config, problems)
    }

    /// Replace invalid values with defaults. Returns one line per problem.
    pub fn validate(&mut self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.websocket.host.trim().is_empty() {
            problems.push("websocket.host is empty".to_string());
            self.websocket.host = WebSocketConfig::default().host;
        }
        if self.websocket.port == 0 {
            problems.push("websocket.port must be > 0".to_string());
            self.websocket.port = WebSocketConfig::default().port;
        }
        if self.reconnect.delay_ms == 0 {
            problems.push("reconnect.delay_ms must be > 0".to_string());
            self.reconnect.delay_ms = ReconnectConfig::default().delay_ms;
        }
        if let Err(e) = Shortcut::parse(&self.overlay.toggle_shortcut) {
            problems.push(format!("overlay.toggle_shortcut: {e}"));
            self.overlay.toggle_shortcut = DEFAULT_TOGGLE_SHORTCUT.to_string();
        }
        let base = self.api.base_url.trim();
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            problems.push(format!("api.base_url {base:?} is not an http(s) URL"));
            self.api.base_url.clear();
        }

        for problem in &problems {
            tracing::warn!(%problem, "invalid client config value, using default");
        }
        problems
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.reconnect.delay_ms),
            max_attempts: self.reconnect.max_attempts,
        }
    }

    pub fn shortcut(&self) -> Shortcut {
        Shortcut::parse(&self.overlay.toggle_shortcut).unwrap_or_default()
    }

    pub fn greeting(&self) -> Option<String> {
        Some(self.overlay.greeting.clone()).filter(|g| !g.is_empty())
    }

    /// WebSocket URL: the settings document's endpoint when one was fetched,
    /// otherwise the configured fallback.
    pub fn ws_url(&self, settings: Option<&SettingsDocument>) -> String {
        match settings {
            Some(doc) => doc.websocket.ws_url(),
            None => Endpoint {
                host: self.websocket.host.clone(),
                port: self.websocket.port,
            }
            .ws_url(),
        }
    }

    /// Base URL for settings API requests, without a trailing slash.
    pub fn api_base<'a>(&'a self, page_origin: &'a str) -> &'a str {
        let base = self.api.base_url.trim();
        let base = if base.is_empty() { page_origin } else { base };
        base.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::from_toml_str("");
        assert_eq!(config.websocket.host, "localhost");
        assert_eq!(config.websocket.port, 7777);
        assert_eq!(config.reconnect_policy(), ReconnectPolicy::default());
        assert_eq!(config.overlay.toggle_shortcut, "Alt+O");
        assert_eq!(config.greeting().as_deref(), Some("overlay connected"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            [reconnect]
            max_attempts = 2

            [overlay]
            greeting = ""
            "#,
        );
        assert_eq!(config.reconnect.max_attempts, 2);
        assert_eq!(config.reconnect.delay_ms, 3000);
        assert_eq!(config.greeting(), None);
        assert_eq!(config.websocket.port, 7777);
    }

    #[test]
    fn unparsable_toml_falls_back() {
        let config = ClientConfig::from_toml_str("[websocket\nport = ");
        assert_eq!(config.websocket.port, 7777);
    }

    #[test]
    fn parse_reports_problems() {
        let (config, problems) = ClientConfig::parse("[websocket\nport = ");
        assert_eq!(config.websocket.port, 7777);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("not valid TOML"));

        let (config, problems) = ClientConfig::parse("[reconnect]\ndelay_ms = 0\n");
        assert_eq!(config.reconnect.delay_ms, 3000);
        assert_eq!(problems, ["reconnect.delay_ms must be > 0"]);

        assert!(ClientConfig::parse("").1.is_empty());
    }

    #[test]
    fn validate_replaces_bad_values() {
        let mut config = ClientConfig::default();
        config.websocket.port = 0;
        config.overlay.toggle_shortcut = "Alt+".to_string();
        config.api.base_url = "ftp://example".to_string();
        let problems = config.validate();
        assert_eq!(problems.len(), 3);
        assert_eq!(config.websocket.port, 7777);
        assert_eq!(config.overlay.toggle_shortcut, "Alt+O");
        assert!(config.api.base_url.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn ws_url_prefers_settings() {
        let config = ClientConfig::from_toml_str("[websocket]\nhost = \"10.0.0.2\"\nport = 9000\n");
        assert_eq!(config.ws_url(None), "ws://10.0.0.2:9000");
        let mut doc = SettingsDocument::default();
        doc.websocket.host = "game-pc".to_string();
        assert_eq!(config.ws_url(Some(&doc)), "ws://game-pc:7777");
    }

    #[test]
    fn api_base_defaults_to_origin() {
        let mut config = ClientConfig::default();
        assert_eq!(config.api_base("http://localhost:8080/"), "http://localhost:8080");
        config.api.base_url = "https://hud.example/".to_string();
        assert_eq!(config.api_base("http://localhost:8080"), "https://hud.example");
    }
}

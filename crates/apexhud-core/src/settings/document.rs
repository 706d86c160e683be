use serde::{Deserialize, Serialize};

use super::overrides::Presets;

pub const DEFAULT_THEME: &str = "dark";
pub const DEFAULT_OPACITY: f64 = 0.8;
pub const DEFAULT_FONT_SIZE: &str = "medium";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_WEBSOCKET_PORT: u16 = 7777;
pub const DEFAULT_HTTP_PORT: u16 = 8080;

pub const DEFAULT_BACKGROUND_COLOR: &str = "rgba(0, 0, 0, 0.7)";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_HEALTH_COLOR: &str = "#2ecc71";
pub const DEFAULT_SHIELD_COLOR: &str = "#3498db";
pub const DEFAULT_ACCENT_COLOR: &str = "#f39c12";

/// The settings record owned by the HTTP backend.
///
/// The client reads it once, edits it through form controls and writes it
/// back whole. `nameOverride.presets` is only ever read here; presets are
/// managed through their own endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsDocument {
    pub overlay: OverlaySettings,
    pub websocket: Endpoint,
    pub http: Endpoint,
    pub name_override: NameOverrideSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    pub theme: String,
    pub opacity: f64,
    pub font_size: String,
    pub show_elements: ShowElements,
    pub colors: ColorSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<OverlayPosition>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            opacity: DEFAULT_OPACITY,
            font_size: DEFAULT_FONT_SIZE.to_string(),
            show_elements: ShowElements::default(),
            colors: ColorSettings::default(),
            position: None,
        }
    }
}

/// Per-region visibility toggles. Anything not explicitly `false` is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowElements {
    pub player_info: bool,
    pub squad_info: bool,
    pub game_state: bool,
    pub kills: bool,
    pub damage: bool,
}

impl Default for ShowElements {
    fn default() -> Self {
        Self {
            player_info: true,
            squad_info: true,
            game_state: true,
            kills: true,
            damage: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub background: String,
    pub text: String,
    pub health: String,
    pub shield: String,
    pub accent: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND_COLOR.to_string(),
            text: DEFAULT_TEXT_COLOR.to_string(),
            health: DEFAULT_HEALTH_COLOR.to_string(),
            shield: DEFAULT_SHIELD_COLOR.to_string(),
            accent: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

/// CSS offsets of the overlay container, e.g. `"20px"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub top: String,
    pub left: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn websocket_default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_WEBSOCKET_PORT,
        }
    }

    pub fn http_default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            overlay: OverlaySettings::default(),
            websocket: Endpoint::websocket_default(),
            http: Endpoint::http_default(),
            name_override: NameOverrideSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameOverrideSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presets: Option<Presets>,
}

/// Raw (possibly partial) shape of the document as received. Sections are
/// kept optional so per-section defaults can differ, e.g. the `http` port.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDocument {
    overlay: Option<OverlaySettings>,
    websocket: Option<PartialEndpoint>,
    http: Option<PartialEndpoint>,
    name_override: Option<NameOverrideSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialEndpoint {
    host: Option<String>,
    port: Option<u16>,
}

impl PartialEndpoint {
    fn resolve(self, fallback: Endpoint) -> Endpoint {
        Endpoint {
            host: self.host.filter(|h| !h.is_empty()).unwrap_or(fallback.host),
            port: self.port.filter(|&p| p != 0).unwrap_or(fallback.port),
        }
    }
}

impl SettingsDocument {
    /// Decode a document, filling every absent field with its documented
    /// default.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw = RawDocument::deserialize(value)?;
        Ok(Self {
            overlay: raw.overlay.unwrap_or_default(),
            websocket: raw
                .websocket
                .unwrap_or_default()
                .resolve(Endpoint::websocket_default()),
            http: raw
                .http
                .unwrap_or_default()
                .resolve(Endpoint::http_default()),
            name_override: raw.name_override.unwrap_or_default(),
        })
    }

    /// The body sent to `POST /api/settings`: everything but the presets.
    pub fn for_submission(&self) -> Self {
        let mut doc = self.clone();
        doc.name_override.presets = None;
        doc
    }
}

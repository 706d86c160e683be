//! Wire types for the settings backend's JSON API.

use serde::{Deserialize, Serialize};

use crate::settings::{NameOverrides, Presets, SettingsDocument};

pub const SETTINGS_PATH: &str = "/api/settings";
pub const OVERRIDE_ADD_PATH: &str = "/api/name-override/add";
pub const OVERRIDE_REMOVE_PATH: &str = "/api/name-override/remove";
pub const OVERRIDE_GET_ALL_PATH: &str = "/api/name-override/get-all";
pub const PRESET_SAVE_PATH: &str = "/api/name-override/save-preset";
pub const PRESET_LOAD_PATH: &str = "/api/name-override/load-preset";
pub const PRESET_DELETE_PATH: &str = "/api/name-override/delete-preset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    Transport(String),
    /// Non-2xx HTTP status.
    Status(u16),
    /// The response body was not the expected JSON.
    Decode(String),
    /// `success: false`, with the backend's message when it sent one.
    Rejected(Option<String>),
    /// Caught locally; no request was sent.
    Invalid(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "request failed: {e}"),
            Self::Status(code) => write!(f, "server responded with HTTP {code}"),
            Self::Decode(e) => write!(f, "unexpected response: {e}"),
            Self::Rejected(Some(m)) => write!(f, "{m}"),
            Self::Rejected(None) => write!(f, "the server rejected the request"),
            Self::Invalid(m) => write!(f, "{m}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOverrideRequest {
    pub player_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOverrideRequest {
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRequest {
    pub preset_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePresetRequest {
    pub preset_name: String,
    pub overrides: NameOverrides,
}

/// The `{ success, message? , ...payload }` envelope every endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(ApiError::Rejected(self.message.filter(|m| !m.is_empty())))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsPayload {
    #[serde(default)]
    pub settings: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverridesPayload {
    #[serde(default)]
    pub overrides: NameOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetsPayload {
    #[serde(default)]
    pub presets: Presets,
}

/// Decode a response body into its payload, mapping `success: false` to
/// [`ApiError::Rejected`].
pub fn decode_envelope<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .into_result()
}

/// Decode a `GET /api/settings` body, filling absent fields with defaults.
pub fn decode_settings(body: &str) -> Result<SettingsDocument, ApiError> {
    let payload: SettingsPayload = decode_envelope(body)?;
    if payload.settings.is_null() {
        return Ok(SettingsDocument::default());
    }
    SettingsDocument::from_json(&payload.settings).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_envelope_decodes() {
        let doc = decode_settings(
            r#"{"success": true, "settings": {"overlay": {"theme": "light"}}}"#,
        )
        .unwrap();
        assert_eq!(doc.overlay.theme, "light");
        assert_eq!(doc.websocket.port, 7777);
    }

    #[test]
    fn failure_carries_message() {
        let err = decode_envelope::<PresetsPayload>(
            r#"{"success": false, "message": "preset 'x' not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err, ApiError::Rejected(Some("preset 'x' not found".to_string())));
        assert_eq!(err.to_string(), "preset 'x' not found");
    }

    #[test]
    fn failure_without_message() {
        let err = decode_envelope::<Ack>(r#"{"success": false}"#).unwrap_err();
        assert_eq!(err, ApiError::Rejected(None));
    }

    #[test]
    fn overrides_payload_decodes() {
        let overrides: OverridesPayload =
            decode_envelope(r#"{"success": true, "overrides": {"42": "Ace"}}"#).unwrap();
        assert_eq!(overrides.overrides.get("42").map(String::as_str), Some("Ace"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_envelope::<Ack>("<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn requests_serialize_camel_case() {
        let body = serde_json::to_value(AddOverrideRequest {
            player_id: "42".to_string(),
            display_name: "Ace".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"playerId": "42", "displayName": "Ace"}));
        let body = serde_json::to_value(PresetRequest {
            preset_name: "finals".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"presetName": "finals"}));
    }
}

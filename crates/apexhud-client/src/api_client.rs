use serde::Serialize;
use serde::de::DeserializeOwned;

use apexhud_core::api::{
    Ack, AddOverrideRequest, ApiError, OVERRIDE_ADD_PATH, OVERRIDE_GET_ALL_PATH,
    OVERRIDE_REMOVE_PATH, OverridesPayload, PRESET_DELETE_PATH, PRESET_LOAD_PATH,
    PRESET_SAVE_PATH, PresetRequest, PresetsPayload, RemoveOverrideRequest, SETTINGS_PATH,
    SavePresetRequest, decode_envelope, decode_settings,
};
use apexhud_core::settings::{NameOverrides, OverrideEntry, Presets, SettingsDocument};

use crate::settings_page::SettingsBackend;

/// Settings backend reached over HTTP with `reqwest` (browser `fetch` on
/// WASM).
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` without a trailing slash, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        read_body(resp).await
    }

    async fn post_text<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        read_body(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decode_envelope(&self.post_text(path, body).await?)
    }
}

async fn read_body(resp: reqwest::Response) -> Result<String, ApiError> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    check_status(status, &body)?;
    Ok(body)
}

/// Non-2xx responses become [`ApiError::Status`], unless the body is an
/// envelope carrying a message worth showing.
fn check_status(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    match decode_envelope::<Ack>(body) {
        Err(ApiError::Rejected(Some(message))) => Err(ApiError::Rejected(Some(message))),
        _ => Err(ApiError::Status(status)),
    }
}

impl SettingsBackend for HttpBackend {
    async fn fetch_settings(&self) -> Result<SettingsDocument, ApiError> {
        decode_settings(&self.get_text(SETTINGS_PATH).await?)
    }

    async fn save_settings(&self, doc: &SettingsDocument) -> Result<(), ApiError> {
        let _: Ack = self.post(SETTINGS_PATH, &doc.for_submission()).await?;
        Ok(())
    }

    async fn add_override(&self, entry: &OverrideEntry) -> Result<NameOverrides, ApiError> {
        let body = AddOverrideRequest {
            player_id: entry.player_id.clone(),
            display_name: entry.display_name.clone(),
        };
        let payload: OverridesPayload = self.post(OVERRIDE_ADD_PATH, &body).await?;
        Ok(payload.overrides)
    }

    async fn remove_override(&self, player_id: &str) -> Result<NameOverrides, ApiError> {
        let body = RemoveOverrideRequest {
            player_id: player_id.to_string(),
        };
        let payload: OverridesPayload = self.post(OVERRIDE_REMOVE_PATH, &body).await?;
        Ok(payload.overrides)
    }

    async fn list_overrides(&self) -> Result<NameOverrides, ApiError> {
        let body = self.get_text(OVERRIDE_GET_ALL_PATH).await?;
        let payload: OverridesPayload = decode_envelope(&body)?;
        Ok(payload.overrides)
    }

    async fn save_preset(
        &self,
        name: &str,
        overrides: &NameOverrides,
    ) -> Result<Presets, ApiError> {
        let body = SavePresetRequest {
            preset_name: name.to_string(),
            overrides: overrides.clone(),
        };
        let payload: PresetsPayload = self.post(PRESET_SAVE_PATH, &body).await?;
        Ok(payload.presets)
    }

    async fn load_preset(&self, name: &str) -> Result<NameOverrides, ApiError> {
        let body = PresetRequest {
            preset_name: name.to_string(),
        };
        let payload: OverridesPayload = self.post(PRESET_LOAD_PATH, &body).await?;
        Ok(payload.overrides)
    }

    async fn delete_preset(&self, name: &str) -> Result<Presets, ApiError> {
        let body = PresetRequest {
            preset_name: name.to_string(),
        };
        let payload: PresetsPayload = self.post(PRESET_DELETE_PATH, &body).await?;
        Ok(payload.presets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let backend = HttpBackend::new("http://localhost:8080/");
        assert_eq!(
            backend.url(SETTINGS_PATH),
            "http://localhost:8080/api/settings"
        );
    }

    #[test]
    fn success_status_passes() {
        assert_eq!(check_status(200, ""), Ok(()));
    }

    #[test]
    fn error_status_prefers_backend_message() {
        assert_eq!(
            check_status(404, r#"{"success": false, "message": "preset not found"}"#),
            Err(ApiError::Rejected(Some("preset not found".to_string())))
        );
        assert_eq!(check_status(502, "Bad Gateway"), Err(ApiError::Status(502)));
        assert_eq!(check_status(500, r#"{"success": false}"#), Err(ApiError::Status(500)));
    }
}

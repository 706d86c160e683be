use super::document::{
    ColorSettings, Endpoint, NameOverrideSettings, OverlayPosition, OverlaySettings,
    SettingsDocument, ShowElements,
};

/// The settings page controls, one field per control, holding the values
/// the way the controls do (text for numeric inputs).
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub theme: String,
    pub opacity: String,
    pub font_size: String,
    pub show_elements: ShowElements,
    pub colors: ColorSettings,
    pub websocket_host: String,
    pub websocket_port: String,
    pub http_host: String,
    pub http_port: String,
    pub name_override_enabled: bool,
    /// Not editable on the page; carried from load to save unchanged.
    pub position: Option<OverlayPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    InvalidOpacity(String),
    InvalidPort { field: &'static str, value: String },
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOpacity(v) => write!(f, "opacity must be a number between 0 and 1: {v:?}"),
            Self::InvalidPort { field, value } => {
                write!(f, "{field} must be a port number (1-65535): {value:?}")
            },
        }
    }
}

impl std::error::Error for FormError {}

impl SettingsForm {
    pub fn from_document(doc: &SettingsDocument) -> Self {
        Self {
            theme: doc.overlay.theme.clone(),
            opacity: doc.overlay.opacity.clamp(0.0, 1.0).to_string(),
            font_size: doc.overlay.font_size.clone(),
            show_elements: doc.overlay.show_elements,
            colors: doc.overlay.colors.clone(),
            websocket_host: doc.websocket.host.clone(),
            websocket_port: doc.websocket.port.to_string(),
            http_host: doc.http.host.clone(),
            http_port: doc.http.port.to_string(),
            name_override_enabled: doc.name_override.enabled,
            position: doc.overlay.position.clone(),
        }
    }

    /// Rebuild the full document from the controls. Presets are never part
    /// of the result.
    pub fn to_document(&self) -> Result<SettingsDocument, FormError> {
        Ok(SettingsDocument {
            overlay: OverlaySettings {
                theme: self.theme.clone(),
                opacity: parse_opacity(&self.opacity)?,
                font_size: self.font_size.clone(),
                show_elements: self.show_elements,
                colors: self.colors.clone(),
                position: self.position.clone(),
            },
            websocket: Endpoint {
                host: self.websocket_host.trim().to_string(),
                port: parse_port("websocket port", &self.websocket_port)?,
            },
            http: Endpoint {
                host: self.http_host.trim().to_string(),
                port: parse_port("http port", &self.http_port)?,
            },
            name_override: NameOverrideSettings {
                enabled: self.name_override_enabled,
                presets: None,
            },
        })
    }
}

fn parse_opacity(s: &str) -> Result<f64, FormError> {
    match s.trim().parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => Err(FormError::InvalidOpacity(s.to_string())),
    }
}

fn parse_port(field: &'static str, s: &str) -> Result<u16, FormError> {
    match s.trim().parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(FormError::InvalidPort {
            field,
            value: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::overrides::{NameOverrides, Presets};

    fn sample_document() -> SettingsDocument {
        let mut presets = Presets::new();
        presets.insert(
            "scrims".to_string(),
            NameOverrides::from([("42".to_string(), "Ace".to_string())]),
        );
        SettingsDocument {
            overlay: OverlaySettings {
                theme: "light".to_string(),
                opacity: 0.35,
                font_size: "large".to_string(),
                show_elements: ShowElements {
                    kills: false,
                    ..ShowElements::default()
                },
                colors: ColorSettings {
                    background: "rgba(12, 34, 56, 0.5)".to_string(),
                    ..ColorSettings::default()
                },
                position: Some(OverlayPosition {
                    top: "40px".to_string(),
                    left: "12px".to_string(),
                }),
            },
            websocket: Endpoint {
                host: "10.0.0.2".to_string(),
                port: 9000,
            },
            http: Endpoint::http_default(),
            name_override: NameOverrideSettings {
                enabled: true,
                presets: Some(presets),
            },
        }
    }

    #[test]
    fn load_then_save_preserves_owned_fields() {
        let doc = sample_document();
        let saved = SettingsForm::from_document(&doc).to_document().unwrap();
        assert_eq!(saved, doc.for_submission());
        assert!(saved.name_override.presets.is_none());
    }

    #[test]
    fn bad_port_is_reported() {
        let mut form = SettingsForm::from_document(&SettingsDocument::default());
        form.websocket_port = "seventy".to_string();
        assert_eq!(
            form.to_document(),
            Err(FormError::InvalidPort {
                field: "websocket port",
                value: "seventy".to_string(),
            })
        );
        form.websocket_port = "0".to_string();
        assert!(form.to_document().is_err());
    }

    #[test]
    fn stored_opacity_is_clamped_for_display() {
        let mut doc = SettingsDocument::default();
        doc.overlay.opacity = 1.5;
        assert_eq!(SettingsForm::from_document(&doc).opacity, "1");
        doc.overlay.opacity = 0.33;
        let form = SettingsForm::from_document(&doc);
        assert_eq!(form.opacity, "0.33");
        assert_eq!(form.to_document().unwrap().overlay.opacity, 0.33);
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let mut form = SettingsForm::from_document(&SettingsDocument::default());
        form.opacity = "1.5".to_string();
        assert!(matches!(
            form.to_document(),
            Err(FormError::InvalidOpacity(_))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip_is_lossless(
                opacity in 0.0f64..=1.0,
                ws_port in 1u16..=u16::MAX,
                http_port in 1u16..=u16::MAX,
                theme in "[a-z]{1,8}",
                host in "[a-z0-9.]{1,16}",
                flags in any::<[bool; 6]>(),
            ) {
                let doc = SettingsDocument {
                    overlay: OverlaySettings {
                        theme,
                        opacity,
                        show_elements: ShowElements {
                            player_info: flags[0],
                            squad_info: flags[1],
                            game_state: flags[2],
                            kills: flags[3],
                            damage: flags[4],
                        },
                        ..OverlaySettings::default()
                    },
                    websocket: Endpoint { host: host.clone(), port: ws_port },
                    http: Endpoint { host, port: http_port },
                    name_override: NameOverrideSettings { enabled: flags[5], presets: None },
                };
                let saved = SettingsForm::from_document(&doc).to_document().unwrap();
                prop_assert_eq!(saved, doc);
            }
        }
    }
}

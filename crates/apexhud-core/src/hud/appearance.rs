use crate::settings::{OverlayPosition, OverlaySettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    /// Unknown names fall back to medium.
    pub fn from_name(name: &str) -> Self {
        match name {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Medium,
        }
    }

    pub fn px(self) -> u32 {
        match self {
            Self::Small => 12,
            Self::Medium => 14,
            Self::Large => 16,
        }
    }
}

/// Overlay regions that can be hidden from the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudElement {
    PlayerInfo,
    SquadInfo,
    GameState,
    Kills,
    Damage,
}

impl HudElement {
    pub const ALL: [Self; 5] = [
        Self::PlayerInfo,
        Self::SquadInfo,
        Self::GameState,
        Self::Kills,
        Self::Damage,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Self::PlayerInfo => "#player-info",
            Self::SquadInfo => "#squad-container",
            Self::GameState => "#game-state",
            Self::Kills => ".kills",
            Self::Damage => ".damage",
        }
    }
}

/// Resolved appearance settings, ready to be written to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearancePlan {
    pub body_class: String,
    pub font_size_px: u32,
    pub panel_opacity: f64,
    pub visibility: Vec<(HudElement, bool)>,
    pub css_vars: Vec<(&'static str, String)>,
    pub position: Option<OverlayPosition>,
}

impl AppearancePlan {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        let show = &settings.show_elements;
        let colors = &settings.colors;
        let theme = if settings.theme.is_empty() {
            crate::settings::document::DEFAULT_THEME
        } else {
            settings.theme.as_str()
        };
        Self {
            body_class: format!("theme-{theme}"),
            font_size_px: FontSize::from_name(&settings.font_size).px(),
            panel_opacity: settings.opacity.clamp(0.0, 1.0),
            visibility: HudElement::ALL
                .iter()
                .map(|&el| {
                    let visible = match el {
                        HudElement::PlayerInfo => show.player_info,
                        HudElement::SquadInfo => show.squad_info,
                        HudElement::GameState => show.game_state,
                        HudElement::Kills => show.kills,
                        HudElement::Damage => show.damage,
                    };
                    (el, visible)
                })
                .collect(),
            css_vars: vec![
                ("--color-background", colors.background.clone()),
                ("--color-text", colors.text.clone()),
                ("--color-health", colors.health.clone()),
                ("--color-shield", colors.shield.clone()),
                ("--color-accent", colors.accent.clone()),
            ],
            position: settings.position.clone(),
        }
    }

    pub fn font_size_css(&self) -> String {
        format!("{}px", self.font_size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShowElements;

    #[test]
    fn defaults_produce_dark_medium() {
        let plan = AppearancePlan::from_settings(&OverlaySettings::default());
        assert_eq!(plan.body_class, "theme-dark");
        assert_eq!(plan.font_size_css(), "14px");
        assert_eq!(plan.panel_opacity, 0.8);
        assert!(plan.visibility.iter().all(|(_, v)| *v));
        assert_eq!(plan.css_vars[2], ("--color-health", "#2ecc71".to_string()));
    }

    #[test]
    fn font_buckets() {
        assert_eq!(FontSize::from_name("small").px(), 12);
        assert_eq!(FontSize::from_name("large").px(), 16);
        assert_eq!(FontSize::from_name("huge").px(), 14);
    }

    #[test]
    fn hidden_elements_are_reported() {
        let settings = OverlaySettings {
            show_elements: ShowElements {
                squad_info: false,
                damage: false,
                ..ShowElements::default()
            },
            ..OverlaySettings::default()
        };
        let hidden: Vec<_> = AppearancePlan::from_settings(&settings)
            .visibility
            .into_iter()
            .filter(|(_, v)| !v)
            .map(|(el, _)| el)
            .collect();
        assert_eq!(hidden, [HudElement::SquadInfo, HudElement::Damage]);
    }
}

pub mod api;
pub mod color;
pub mod config;
pub mod hud;
pub mod net;
pub mod settings;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::settings::{NameOverrides, Presets, SettingsDocument};
    use crate::telemetry::{MatchInfo, PlayerStats, Snapshot};

    /// A squad member or local player with full vitals.
    pub fn make_player(name: &str, legend: &str) -> PlayerStats {
        PlayerStats {
            id: None,
            name: Some(name.to_string()),
            legend: Some(legend.to_string()),
            health: 100,
            max_health: 100,
            shields: 50,
            max_shields: 100,
            kills: 0,
            damage: 0,
        }
    }

    /// In-progress snapshot for `player` with the given squad names.
    pub fn make_snapshot(player: &str, squad: &[&str]) -> Snapshot {
        Snapshot {
            game_state: Some("playing".to_string()),
            match_info: Some(MatchInfo {
                in_progress: true,
                remaining_squads: Some(12),
                squad_eliminated: false,
            }),
            player: Some(make_player(player, "Wraith")),
            squad: Some(squad.iter().map(|n| make_player(n, "Bangalore")).collect()),
            error: None,
        }
    }

    pub fn make_overrides(pairs: &[(&str, &str)]) -> NameOverrides {
        pairs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    /// Settings document whose name-override section carries `presets`.
    pub fn settings_with_presets(names: &[&str]) -> SettingsDocument {
        let presets: Presets = names
            .iter()
            .map(|n| (n.to_string(), NameOverrides::new()))
            .collect();
        let mut doc = SettingsDocument::default();
        doc.name_override.presets = Some(presets);
        doc
    }
}

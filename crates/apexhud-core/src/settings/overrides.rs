use std::collections::BTreeMap;

/// Player id → display name substitutions, as stored by the backend.
pub type NameOverrides = BTreeMap<String, String>;

/// Named, saved copies of the full override mapping.
pub type Presets = BTreeMap<String, NameOverrides>;

/// Preset names in display order.
pub fn preset_names(presets: &Presets) -> Vec<String> {
    presets.keys().cloned().collect()
}

/// A validated `(playerId, displayName)` pair ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub player_id: String,
    pub display_name: String,
}

impl OverrideEntry {
    /// Trim both inputs; `None` when either ends up empty.
    pub fn from_inputs(player_id: &str, display_name: &str) -> Option<Self> {
        let player_id = player_id.trim();
        let display_name = display_name.trim();
        if player_id.is_empty() || display_name.is_empty() {
            return None;
        }
        Some(Self {
            player_id: player_id.to_string(),
            display_name: display_name.to_string(),
        })
    }
}

/// Trimmed, non-empty preset name.
pub fn preset_name(input: &str) -> Option<String> {
    let name = input.trim();
    (!name.is_empty()).then(|| name.to_string())
}

use crate::telemetry::{PlayerStats, Snapshot};

use super::view::{MatchView, MemberView, PLACEHOLDER, PlayerView};

/// Everything the renderer needs to write for one snapshot. A `None` region
/// is left as it is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HudFrame {
    pub phase: Option<String>,
    pub match_view: Option<MatchView>,
    pub player: Option<PlayerView>,
    /// When set, the roster is cleared and rebuilt from exactly these rows.
    pub squad: Option<Vec<MemberView>>,
}

/// Who the local player currently is on screen, used to keep them out of
/// the squad roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LocalPlayer {
    /// The displayed name text, placeholder included.
    name: String,
    id: Option<String>,
}

/// Turns snapshots into [`HudFrame`]s.
///
/// The only state carried between snapshots is the identity of the player
/// last drawn in the player region.
#[derive(Debug, Default)]
pub struct HudModel {
    local: Option<LocalPlayer>,
}

impl HudModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, snapshot: &Snapshot) -> HudFrame {
        let player = snapshot.player.as_ref().map(|stats| {
            let view = PlayerView::from_stats(stats);
            self.local = Some(LocalPlayer {
                name: view.name.clone(),
                id: stats.id.clone(),
            });
            view
        });

        let squad = snapshot.squad.as_ref().map(|members| {
            members
                .iter()
                .filter(|m| !self.is_local(m))
                .map(MemberView::from_stats)
                .collect()
        });

        HudFrame {
            phase: snapshot
                .game_state
                .as_ref()
                .map(|s| if s.is_empty() { PLACEHOLDER } else { s.as_str() }.to_string()),
            match_view: snapshot.match_info.as_ref().map(MatchView::from_match),
            player,
            squad,
        }
    }

    /// Name currently shown in the player region, if any player was drawn.
    pub fn local_name(&self) -> Option<&str> {
        self.local.as_ref().map(|l| l.name.as_str())
    }

    // Ids win when both sides carry one; otherwise the roster entry is
    // matched by its raw name against the displayed name text, which
    // excludes every member sharing that name.
    fn is_local(&self, member: &PlayerStats) -> bool {
        let Some(local) = &self.local else {
            return false;
        };
        if let (Some(local_id), Some(member_id)) = (&local.id, &member.id) {
            return local_id == member_id;
        }
        member.name.as_deref() == Some(local.name.as_str())
    }
}

use crate::telemetry::{MatchInfo, PlayerStats, percent};

/// Shown in place of a missing name, legend or phase.
pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    InMatch,
    OutOfMatch,
    SquadEliminated,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InMatch => "In match",
            Self::OutOfMatch => "Out of match",
            Self::SquadEliminated => "Squad eliminated",
        }
    }

    /// CSS class for the status text; elimination gets its own treatment.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::InMatch => "match-live",
            Self::OutOfMatch => "match-idle",
            Self::SquadEliminated => "match-eliminated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    pub status: MatchStatus,
    /// Only set while a match is in progress.
    pub remaining_squads: Option<u32>,
}

impl MatchView {
    pub fn from_match(info: &MatchInfo) -> Self {
        let status = if info.squad_eliminated {
            MatchStatus::SquadEliminated
        } else if info.in_progress {
            MatchStatus::InMatch
        } else {
            MatchStatus::OutOfMatch
        };
        Self {
            status,
            remaining_squads: if info.in_progress {
                info.remaining_squads
            } else {
                None
            },
        }
    }

    pub fn remaining_text(&self) -> Option<String> {
        self.remaining_squads
            .map(|n| format!("{n} squads remaining"))
    }
}

/// A value/max pair drawn as a filled bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarView {
    pub value: u32,
    pub max: u32,
    pub percent: f64,
}

impl BarView {
    pub fn new(value: u32, max: u32) -> Self {
        Self {
            value,
            max,
            percent: percent(value, max),
        }
    }

    pub fn text(&self) -> String {
        format!("{}/{}", self.value, self.max)
    }

    /// CSS width, e.g. `"50%"`, rounded to two decimals.
    pub fn width(&self) -> String {
        let rounded = (self.percent * 100.0).round() / 100.0;
        format!("{rounded}%")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub name: String,
    pub legend: String,
    pub health: BarView,
    pub shields: BarView,
    pub kills: String,
    pub damage: String,
}

impl PlayerView {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        Self {
            name: stats.display_name().unwrap_or(PLACEHOLDER).to_string(),
            legend: stats.display_legend().unwrap_or(PLACEHOLDER).to_string(),
            health: BarView::new(stats.health, stats.max_health),
            shields: BarView::new(stats.shields, stats.max_shields),
            kills: stats.kills.to_string(),
            damage: stats.damage.to_string(),
        }
    }
}

/// One roster row.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberView {
    pub name: String,
    pub legend: String,
    pub health: BarView,
    pub shields: BarView,
}

impl MemberView {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        Self {
            name: stats.display_name().unwrap_or(PLACEHOLDER).to_string(),
            legend: stats.display_legend().unwrap_or(PLACEHOLDER).to_string(),
            health: BarView::new(stats.health, stats.max_health),
            shields: BarView::new(stats.shields, stats.max_shields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_only_while_in_match() {
        let live = MatchView::from_match(&MatchInfo {
            in_progress: true,
            remaining_squads: Some(12),
            squad_eliminated: false,
        });
        assert_eq!(live.status, MatchStatus::InMatch);
        assert_eq!(live.remaining_text().as_deref(), Some("12 squads remaining"));

        let idle = MatchView::from_match(&MatchInfo {
            in_progress: false,
            remaining_squads: Some(12),
            squad_eliminated: false,
        });
        assert_eq!(idle.status, MatchStatus::OutOfMatch);
        assert_eq!(idle.remaining_text(), None);
    }

    #[test]
    fn elimination_overrides_status() {
        let view = MatchView::from_match(&MatchInfo {
            in_progress: true,
            remaining_squads: Some(3),
            squad_eliminated: true,
        });
        assert_eq!(view.status, MatchStatus::SquadEliminated);
        assert_eq!(view.status.label(), "Squad eliminated");
        assert_eq!(view.remaining_squads, Some(3));
    }

    #[test]
    fn bar_width_formats() {
        assert_eq!(BarView::new(50, 100).width(), "50%");
        assert_eq!(BarView::new(1, 3).width(), "33.33%");
        assert_eq!(BarView::new(5, 0).width(), "0%");
        assert_eq!(BarView::new(25, 50).text(), "25/50");
    }

    #[test]
    fn missing_name_uses_placeholder() {
        let view = PlayerView::from_stats(&PlayerStats::default());
        assert_eq!(view.name, PLACEHOLDER);
        assert_eq!(view.legend, PLACEHOLDER);
        assert_eq!(view.kills, "0");
    }
}

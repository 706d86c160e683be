use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One complete telemetry payload for the current instant.
///
/// Every section is optional: a frame that omits `match`, `player` or `squad`
/// leaves the corresponding overlay region as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub game_state: Option<String>,
    #[serde(rename = "match")]
    pub match_info: Option<MatchInfo>,
    pub player: Option<PlayerStats>,
    pub squad: Option<Vec<PlayerStats>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    pub in_progress: bool,
    #[serde(deserialize_with = "lenient_opt_count")]
    pub remaining_squads: Option<u32>,
    pub squad_eliminated: bool,
}

/// Vitals and counters for the local player or one squad member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    /// Stable identifier, when the upstream source provides one.
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub legend: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub health: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub max_health: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub shields: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub max_shields: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub kills: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub damage: u32,
}

impl PlayerStats {
    /// Name with empty strings treated as absent.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    pub fn display_legend(&self) -> Option<&str> {
        non_empty(self.legend.as_deref())
    }

    pub fn health_percent(&self) -> f64 {
        percent(self.health, self.max_health)
    }

    pub fn shield_percent(&self) -> f64 {
        percent(self.shields, self.max_shields)
    }
}

/// `value / max` as a percentage in `[0, 100]`. A zero max yields exactly 0.
pub fn percent(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(max) * 100.0).clamp(0.0, 100.0)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// What a parsed JSON frame turned out to carry.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Snapshot(Box<Snapshot>),
    /// The payload carried a non-empty `error` field.
    ServerError(String),
    /// Valid JSON whose shape does not match a snapshot.
    Malformed(String),
}

/// Classify a frame that has already been parsed as JSON.
pub fn classify_frame(value: &Value) -> FrameOutcome {
    if let Some(message) = server_error(value) {
        return FrameOutcome::ServerError(message);
    }
    match Snapshot::deserialize(value) {
        Ok(snapshot) => FrameOutcome::Snapshot(Box::new(snapshot)),
        Err(e) => FrameOutcome::Malformed(e.to_string()),
    }
}

/// Falsy `error` values (`null`, `false`, `0`, `""`) mean no error.
fn server_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Upstream producers are loose about numeric types (floats, strings, nulls),
// so counters accept anything number-like and fall back to 0.

fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .or_else(|| {
                n.as_f64().map(|f| {
                    if f.is_finite() && f > 0.0 {
                        f.min(f64::from(u32::MAX)) as u32
                    } else {
                        0
                    }
                })
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(count_from_value).unwrap_or(0))
}

fn lenient_opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

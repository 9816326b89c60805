use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `bootstrap-static/` payload. Only the fields the feature builder reads are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub elements: Vec<RawPlayer>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

// The API ships most decimals as strings ("5.2"), some as numbers, and
// occasionally null. Everything numeric is read leniently and defaulted on ingest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub web_name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub team: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub element_type: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub now_cost: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub form: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub points_per_game: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub selected_by_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ict_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bonus: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_goal_involvements_per_90: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_next: bool,
}

/// One row of `fixtures/`. `event` is null for fixtures not yet scheduled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub event: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub finished: bool,
    pub team_h: u32,
    pub team_a: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub team_h_difficulty: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub team_a_difficulty: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Maps the API `element_type`. Unknown codes fall back to midfield.
    pub fn from_element_type(code: Option<u32>) -> Self {
        match code {
            Some(1) => Position::Goalkeeper,
            Some(2) => Position::Defender,
            Some(3) => Position::Midfielder,
            Some(4) => Position::Forward,
            _ => Position::Midfielder,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_uppercase();
        Position::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| anyhow!("unknown position {raw:?} (expected GK, DEF, MID or FWD)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Available,
    Uncertain,
}

impl PlayerStatus {
    /// `a` and `u` are the only statuses that make it into the ranked pool.
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "a" => Some(PlayerStatus::Available),
            "u" => Some(PlayerStatus::Uncertain),
            _ => None,
        }
    }
}

/// Sanitized, fully populated player row. Produced by the feature builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub price: f64,
    pub form: f64,
    pub ppg: f64,
    pub ownership: f64,
    pub minutes_pct: f64,
    pub ict_index: f64,
    pub bonus: u32,
    pub xgi_per90: f64,
    pub fdr: u32,
    pub fixture_ease: u32,
    pub status: PlayerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub player: PlayerRecord,
    pub score: f64,
}

impl ScoredRecord {
    pub fn features(&self) -> &PlayerRecord {
        &self.player
    }
}

/// One finished gameweek from `element-summary/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRow {
    pub round: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub opponent_team: u32,
    #[serde(default)]
    pub was_home: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerHistory {
    pub player_id: u32,
    pub history: Vec<HistoryRow>,
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_f64)
        .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32))
}

// Null or non-string text becomes empty; the feature builder treats empty as unknown.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { s.parse::<f64>().ok() }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

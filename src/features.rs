use std::collections::HashMap;

use tracing::{debug, info};

use crate::model::{Bootstrap, Fixture, PlayerRecord, PlayerStatus, Position, RawEvent, RawPlayer};

pub const NEUTRAL_DIFFICULTY: u32 = 3;
pub const UNKNOWN_TEAM: &str = "???";
const MINUTES_PER_MATCH: u32 = 90;

#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub current_gw: u32,
    pub players: Vec<PlayerRecord>,
}

/// Build the sanitized player table for the gameweek the recommendation targets.
pub fn build_player_records(bootstrap: &Bootstrap, fixtures: &[Fixture]) -> FeatureSet {
    let current_gw = current_gameweek(&bootstrap.events);
    info!(gameweek = current_gw, "analysing gameweek");

    let team_names: HashMap<u32, &str> = bootstrap
        .teams
        .iter()
        .map(|t| (t.id, t.short_name.as_str()))
        .collect();
    let difficulty = next_fixture_difficulty(fixtures, current_gw);
    let available_minutes = available_minutes(current_gw);

    let mut players = Vec::with_capacity(bootstrap.elements.len());
    let mut excluded = 0usize;
    for raw in &bootstrap.elements {
        let Some(status) = PlayerStatus::from_api(&raw.status) else {
            excluded += 1;
            continue;
        };
        players.push(sanitize_player(
            raw,
            status,
            &team_names,
            &difficulty,
            available_minutes,
        ));
    }
    debug!(
        included = players.len(),
        excluded, "filtered players by availability"
    );

    FeatureSet {
        current_gw,
        players,
    }
}

/// The event flagged `is_next`, else the last listed event (season over).
/// An empty event list is treated as the first gameweek.
pub fn current_gameweek(events: &[RawEvent]) -> u32 {
    events
        .iter()
        .find(|e| e.is_next)
        .or_else(|| events.last())
        .map(|e| e.id)
        .unwrap_or(1)
}

/// Difficulty of each team's unfinished fixture in `gameweek`. Teams with a
/// blank gameweek are absent; double gameweeks keep the last listed fixture.
pub fn next_fixture_difficulty(fixtures: &[Fixture], gameweek: u32) -> HashMap<u32, u32> {
    let mut out = HashMap::new();
    for f in fixtures {
        if f.event != Some(gameweek) || f.finished {
            continue;
        }
        out.insert(f.team_h, clamp_difficulty(f.team_h_difficulty));
        out.insert(f.team_a, clamp_difficulty(f.team_a_difficulty));
    }
    out
}

/// Crude proxy for minutes a player could have played so far; never below 1.
pub fn available_minutes(current_gw: u32) -> u32 {
    current_gw
        .saturating_sub(1)
        .saturating_mul(MINUTES_PER_MATCH)
        .max(1)
}

fn clamp_difficulty(raw: Option<u32>) -> u32 {
    raw.unwrap_or(NEUTRAL_DIFFICULTY).clamp(1, 5)
}

fn sanitize_player(
    raw: &RawPlayer,
    status: PlayerStatus,
    team_names: &HashMap<u32, &str>,
    difficulty: &HashMap<u32, u32>,
    available_minutes: u32,
) -> PlayerRecord {
    let team = raw
        .team
        .and_then(|id| team_names.get(&id).copied())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_TEAM)
        .to_string();
    let fdr = raw
        .team
        .and_then(|id| difficulty.get(&id).copied())
        .unwrap_or(NEUTRAL_DIFFICULTY);

    PlayerRecord {
        id: raw.id,
        name: raw.web_name.clone(),
        team,
        position: Position::from_element_type(raw.element_type),
        price: f64::from(raw.now_cost.unwrap_or(0)) / 10.0,
        form: raw.form.unwrap_or(0.0),
        ppg: raw.points_per_game.unwrap_or(0.0),
        ownership: raw.selected_by_percent.unwrap_or(0.0),
        minutes_pct: f64::from(raw.minutes.unwrap_or(0)) / f64::from(available_minutes),
        ict_index: raw.ict_index.unwrap_or(0.0),
        bonus: raw.bonus.unwrap_or(0),
        xgi_per90: raw.expected_goal_involvements_per_90.unwrap_or(0.0),
        fdr,
        fixture_ease: 6 - fdr,
        status,
    }
}

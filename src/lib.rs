pub mod config;
pub mod features;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod source;

use crate::model::ScoredRecord;
use crate::scoring::ScoringConfig;
use crate::source::Snapshot;

/// Ranked output of one run.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub current_gw: u32,
    pub ranked: Vec<ScoredRecord>,
}

/// Feature building and scoring over one snapshot.
pub fn rank_snapshot(snapshot: &Snapshot, config: &ScoringConfig) -> Ranking {
    let features = features::build_player_records(&snapshot.bootstrap, &snapshot.fixtures);
    Ranking {
        current_gw: features.current_gw,
        ranked: scoring::score_players_with(&features.players, config),
    }
}

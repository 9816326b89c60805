use tracing::debug;

use crate::model::{PlayerRecord, ScoredRecord};

/// Inputs to the weighted score, in weight-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Form,
    Ppg,
    FixtureEase,
    XgiPer90,
    IctIndex,
    Bonus,
    Ownership,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Form,
        Feature::Ppg,
        Feature::FixtureEase,
        Feature::XgiPer90,
        Feature::IctIndex,
        Feature::Bonus,
        Feature::Ownership,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Form => "form",
            Feature::Ppg => "ppg",
            Feature::FixtureEase => "fixture_ease",
            Feature::XgiPer90 => "xgi_per90",
            Feature::IctIndex => "ict_index",
            Feature::Bonus => "bonus",
            Feature::Ownership => "ownership",
        }
    }

    pub fn value(self, p: &PlayerRecord) -> f64 {
        match self {
            Feature::Form => p.form,
            Feature::Ppg => p.ppg,
            Feature::FixtureEase => f64::from(p.fixture_ease),
            Feature::XgiPer90 => p.xgi_per90,
            Feature::IctIndex => p.ict_index,
            Feature::Bonus => f64::from(p.bonus),
            Feature::Ownership => p.ownership,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Signed weight per feature. Magnitudes need not sum to 1; the score is rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub form: f64,
    pub ppg: f64,
    pub fixture_ease: f64,
    pub xgi_per90: f64,
    pub ict_index: f64,
    pub bonus: f64,
    // Negative on top of the inversion: high ownership is penalised twice.
    pub ownership: f64,
}

impl Weights {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Form => self.form,
            Feature::Ppg => self.ppg,
            Feature::FixtureEase => self.fixture_ease,
            Feature::XgiPer90 => self.xgi_per90,
            Feature::IctIndex => self.ict_index,
            Feature::Bonus => self.bonus,
            Feature::Ownership => self.ownership,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            form: 0.30,
            ppg: 0.25,
            fixture_ease: 0.20,
            xgi_per90: 0.15,
            ict_index: 0.10,
            bonus: 0.08,
            ownership: -0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Minutes fraction below which a player counts as a rotation risk.
    pub rotation_threshold: f64,
    pub rotation_multiplier: f64,
    pub scale: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            rotation_threshold: 0.6,
            rotation_multiplier: 0.7,
            scale: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Bounds { min: v, max: v }),
            Some(b) => Some(Bounds {
                min: b.min.min(v),
                max: b.max.max(v),
            }),
        })
    }

    /// Maps into [0, 1]. A zero range maps everything to 0; for ownership that
    /// 0 is then inverted to 1 like any other minimum.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

/// Min-max normalize a column against its own bounds.
pub fn normalize_min_max(values: &[f64]) -> Vec<f64> {
    let Some(bounds) = Bounds::of(values.iter().copied()) else {
        return Vec::new();
    };
    values.iter().map(|v| bounds.normalize(*v)).collect()
}

/// Per-feature bounds for one player population. Built fresh for every
/// scoring pass; bounds from one snapshot are meaningless for another.
#[derive(Debug, Clone)]
pub struct Normalizer {
    bounds: [Bounds; 7],
}

impl Normalizer {
    pub fn fit(players: &[PlayerRecord]) -> Option<Self> {
        if players.is_empty() {
            return None;
        }
        let mut bounds = [Bounds { min: 0.0, max: 0.0 }; 7];
        for feature in Feature::ALL {
            bounds[feature.index()] = Bounds::of(players.iter().map(|p| feature.value(p)))?;
        }
        Some(Self { bounds })
    }

    pub fn bounds(&self, feature: Feature) -> Bounds {
        self.bounds[feature.index()]
    }

    /// Normalized value as it enters the weighted sum (ownership inverted).
    pub fn normalized(&self, feature: Feature, p: &PlayerRecord) -> f64 {
        let n = self.bounds(feature).normalize(feature.value(p));
        match feature {
            Feature::Ownership => 1.0 - n,
            _ => n,
        }
    }

    /// Weighted term per feature, in `Feature::ALL` order.
    pub fn contributions(&self, weights: &Weights, p: &PlayerRecord) -> [f64; 7] {
        Feature::ALL.map(|f| weights.get(f) * self.normalized(f, p))
    }
}

pub fn score_players(players: &[PlayerRecord]) -> Vec<ScoredRecord> {
    score_players_with(players, &ScoringConfig::default())
}

/// Score and rank. Ties keep the input order.
pub fn score_players_with(players: &[PlayerRecord], config: &ScoringConfig) -> Vec<ScoredRecord> {
    let Some(normalizer) = Normalizer::fit(players) else {
        return Vec::new();
    };

    let mut scored: Vec<ScoredRecord> = players
        .iter()
        .map(|p| ScoredRecord {
            player: p.clone(),
            score: final_score(&normalizer, config, p),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(players = scored.len(), "scored players");
    scored
}

/// Re-score an already ranked table, ignoring its existing scores.
pub fn rescore(scored: &[ScoredRecord], config: &ScoringConfig) -> Vec<ScoredRecord> {
    let players: Vec<PlayerRecord> = scored.iter().map(|s| s.features().clone()).collect();
    score_players_with(&players, config)
}

pub fn is_rotation_risk(config: &ScoringConfig, p: &PlayerRecord) -> bool {
    p.minutes_pct < config.rotation_threshold
}

/// Weighted sum before the rotation penalty and scaling.
pub fn raw_score(normalizer: &Normalizer, config: &ScoringConfig, p: &PlayerRecord) -> f64 {
    normalizer.contributions(&config.weights, p).iter().sum()
}

fn final_score(normalizer: &Normalizer, config: &ScoringConfig, p: &PlayerRecord) -> f64 {
    let mut raw = raw_score(normalizer, config, p);
    if is_rotation_risk(config, p) {
        raw *= config.rotation_multiplier;
    }
    round_1dp(raw * config.scale)
}

// Half-to-even, like numpy's `around`.
fn round_1dp(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

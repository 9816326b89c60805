use crate::model::{Position, ScoredRecord};

pub const DEFAULT_TOP_N: usize = 20;

/// Read-only slice of a ranked table. Never re-sorts or re-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationQuery {
    pub position: Option<Position>,
    /// Inclusive.
    pub max_price: Option<f64>,
    pub top_n: usize,
}

impl Default for RecommendationQuery {
    fn default() -> Self {
        Self {
            position: None,
            max_price: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl RecommendationQuery {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn matches(&self, row: &ScoredRecord) -> bool {
        if let Some(position) = self.position
            && row.player.position != position
        {
            return false;
        }
        if let Some(max_price) = self.max_price
            && row.player.price > max_price
        {
            return false;
        }
        true
    }
}

pub fn get_recommendations<'a>(
    ranked: &'a [ScoredRecord],
    query: &RecommendationQuery,
) -> Vec<&'a ScoredRecord> {
    ranked
        .iter()
        .filter(|row| query.matches(row))
        .take(query.top_n)
        .collect()
}

use std::path::PathBuf;

use anyhow::{Context, Result};

use fpl_scout::recommend::{RecommendationQuery, get_recommendations};
use fpl_scout::report::render_table;
use fpl_scout::scoring::ScoringConfig;
use fpl_scout::source::{Snapshot, parse_bootstrap_json, parse_fixtures_json, read_file};

// Offline scoring of two saved API responses; no network, no export.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let bootstrap_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/bootstrap.json"));
    let fixtures_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/fixtures.json"));

    let snapshot = Snapshot {
        bootstrap: parse_bootstrap_json(&read_file(&bootstrap_path)?)
            .with_context(|| format!("parsing {}", bootstrap_path.display()))?,
        fixtures: parse_fixtures_json(&read_file(&fixtures_path)?)
            .with_context(|| format!("parsing {}", fixtures_path.display()))?,
    };

    let ranking = fpl_scout::rank_snapshot(&snapshot, &ScoringConfig::default());
    println!("GW {}: {} players ranked", ranking.current_gw, ranking.ranked.len());
    let top = get_recommendations(&ranking.ranked, &RecommendationQuery::new(20));
    print!("{}", render_table(top));

    Ok(())
}

use std::fs;
use std::path::PathBuf;

use fpl_scout::model::{PlayerRecord, PlayerStatus, Position};
use fpl_scout::scoring::{
    Feature, Normalizer, ScoringConfig, Weights, raw_score, rescore, score_players,
    score_players_with,
};
use fpl_scout::source::{Snapshot, parse_bootstrap_json, parse_fixtures_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[allow(clippy::too_many_arguments)]
fn player(
    id: u32,
    form: f64,
    ppg: f64,
    fixture_ease: u32,
    xgi: f64,
    ict: f64,
    bonus: u32,
    ownership: f64,
    minutes_pct: f64,
) -> PlayerRecord {
    PlayerRecord {
        id,
        name: format!("Player {id}"),
        team: "TST".to_string(),
        position: Position::Midfielder,
        price: 5.0,
        form,
        ppg,
        ownership,
        minutes_pct,
        ict_index: ict,
        bonus,
        xgi_per90: xgi,
        fdr: 6 - fixture_ease,
        fixture_ease,
        status: PlayerStatus::Available,
    }
}

fn two_player_example() -> Vec<PlayerRecord> {
    vec![
        player(1, 8.0, 6.0, 4, 0.5, 50.0, 3, 10.0, 0.9),
        player(2, 2.0, 2.0, 2, 0.1, 10.0, 0, 40.0, 0.3),
    ]
}

#[test]
fn two_player_example_ranks_and_penalises() {
    let players = two_player_example();
    let normalizer = Normalizer::fit(&players).unwrap();

    // Player 1 tops every feature; its low ownership inverts to 1 as well.
    for feature in Feature::ALL {
        assert_eq!(normalizer.normalized(feature, &players[0]), 1.0, "{}", feature.name());
        assert_eq!(normalizer.normalized(feature, &players[1]), 0.0, "{}", feature.name());
    }

    let scored = score_players(&players);
    assert_eq!(scored[0].player.id, 1);
    assert_eq!(scored[1].player.id, 2);
    // 0.30 + 0.25 + 0.20 + 0.15 + 0.10 + 0.08 - 0.05 (inverted low ownership)
    assert_eq!(scored[0].score, 103.0);
    assert_eq!(scored[1].score, 0.0);
}

#[test]
fn normalized_values_stay_in_unit_range() {
    let bootstrap = parse_bootstrap_json(&read_fixture("bootstrap.json")).unwrap();
    let fixtures = parse_fixtures_json(&read_fixture("fixtures.json")).unwrap();
    let set = fpl_scout::features::build_player_records(&bootstrap, &fixtures);
    let normalizer = Normalizer::fit(&set.players).unwrap();

    for feature in Feature::ALL {
        let values: Vec<f64> = set
            .players
            .iter()
            .map(|p| normalizer.bounds(feature).normalize(feature.value(p)))
            .collect();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(values.contains(&0.0), "{} has no zero", feature.name());
        assert!(values.contains(&1.0), "{} has no one", feature.name());
    }
}

#[test]
fn constant_feature_normalizes_to_zero_before_inversion() {
    let players = vec![
        player(1, 5.0, 4.0, 3, 0.2, 20.0, 2, 10.0, 1.0),
        player(2, 5.0, 2.0, 3, 0.2, 20.0, 2, 10.0, 1.0),
    ];
    let normalizer = Normalizer::fit(&players).unwrap();
    let weights = Weights::default();
    for p in &players {
        let c = normalizer.contributions(&weights, p);
        assert_eq!(c[0], 0.0);
        assert_eq!(c[2], 0.0);
        assert!(c.iter().all(|v| v.is_finite()));
        // Constant ownership normalizes to 0, inverts to 1, then takes the negative weight.
        assert_eq!(c[6], -0.05);
    }
    let scored = score_players(&players);
    assert_eq!(scored[0].player.id, 1);
    assert_eq!(scored[0].score, 20.0);
    assert_eq!(scored[1].score, -5.0);
}

#[test]
fn constant_ownership_term_is_scaled_by_rotation_penalty() {
    let players = vec![
        player(1, 5.0, 4.0, 3, 0.2, 20.0, 2, 10.0, 1.0),
        player(2, 5.0, 2.0, 3, 0.2, 20.0, 2, 10.0, 0.3),
    ];
    let scored = score_players(&players);
    assert_eq!(scored[0].player.id, 1);
    // 0.25 (ppg) - 0.05 (inverted constant ownership), no penalty.
    assert_eq!(scored[0].score, 20.0);
    // Only the ownership term remains, and it is penalised with the rest: -0.05 * 0.7.
    assert_eq!(scored[1].score, -3.5);
}

#[test]
fn empty_population_scores_nothing() {
    assert!(score_players(&[]).is_empty());
    assert!(Normalizer::fit(&[]).is_none());
}

#[test]
fn fixture_snapshot_ranking() {
    let snapshot = Snapshot {
        bootstrap: parse_bootstrap_json(&read_fixture("bootstrap.json")).unwrap(),
        fixtures: parse_fixtures_json(&read_fixture("fixtures.json")).unwrap(),
    };
    let ranking = fpl_scout::rank_snapshot(&snapshot, &ScoringConfig::default());
    assert_eq!(ranking.current_gw, 10);

    let order: Vec<&str> = ranking.ranked.iter().map(|r| r.player.name.as_str()).collect();
    assert_eq!(
        order,
        vec!["Saka", "Salah", "Haaland", "Raya", "Rotation", "Mystery"]
    );
    assert_eq!(ranking.ranked[0].score, 88.6);
    assert_eq!(ranking.ranked[2].score, 83.5);
    assert_eq!(ranking.ranked[3].score, 49.4);
    assert_eq!(ranking.ranked[4].score, 13.4);
    assert_eq!(ranking.ranked[5].score, 3.5);
    assert!(
        ranking
            .ranked
            .windows(2)
            .all(|w| w[0].score >= w[1].score)
    );
}

#[test]
fn scoring_is_deterministic_and_idempotent() {
    let bootstrap = parse_bootstrap_json(&read_fixture("bootstrap.json")).unwrap();
    let fixtures = parse_fixtures_json(&read_fixture("fixtures.json")).unwrap();
    let set = fpl_scout::features::build_player_records(&bootstrap, &fixtures);
    let config = ScoringConfig::default();

    let first = score_players_with(&set.players, &config);
    let second = score_players_with(&set.players, &config);
    assert_eq!(first, second);

    let again = rescore(&first, &config);
    let scores = |rows: &[fpl_scout::model::ScoredRecord]| {
        let mut out: Vec<(u32, f64)> = rows.iter().map(|r| (r.player.id, r.score)).collect();
        out.sort_by_key(|(id, _)| *id);
        out
    };
    assert_eq!(scores(&first[..]), scores(&again[..]));
}

#[test]
fn ties_keep_input_order() {
    let players = vec![
        player(10, 5.0, 5.0, 3, 0.3, 30.0, 3, 10.0, 1.0),
        player(11, 9.0, 9.0, 5, 0.9, 90.0, 9, 1.0, 1.0),
        player(12, 5.0, 5.0, 3, 0.3, 30.0, 3, 10.0, 1.0),
        player(13, 5.0, 5.0, 3, 0.3, 30.0, 3, 10.0, 1.0),
    ];
    let scored = score_players(&players);
    let ids: Vec<u32> = scored.iter().map(|r| r.player.id).collect();
    assert_eq!(ids, vec![11, 10, 12, 13]);
}

#[test]
fn rotation_risk_never_outranks_a_regular_twin() {
    let config = ScoringConfig::default();
    for minutes in [0.0, 0.3, 0.59] {
        let players = vec![
            player(1, 2.0, 2.0, 2, 0.1, 10.0, 0, 40.0, 1.0),
            player(2, 6.0, 5.0, 4, 0.4, 40.0, 3, 20.0, minutes),
            player(3, 6.0, 5.0, 4, 0.4, 40.0, 3, 20.0, 0.6),
        ];
        let scored = score_players_with(&players, &config);
        let pos = |id: u32| scored.iter().position(|r| r.player.id == id).unwrap();
        assert!(pos(3) < pos(2));

        let normalizer = Normalizer::fit(&players).unwrap();
        let pre = raw_score(&normalizer, &config, &players[1]) * config.scale;
        let penalised = scored[pos(2)].score;
        assert!(penalised < pre);
        assert!((penalised - pre * 0.7).abs() <= 0.05 + 1e-9);
    }
}

#[test]
fn lower_ownership_scores_higher_on_inverted_term() {
    let players = vec![
        player(1, 5.0, 5.0, 3, 0.3, 30.0, 3, 5.0, 1.0),
        player(2, 5.0, 5.0, 3, 0.3, 30.0, 3, 55.0, 1.0),
        player(3, 1.0, 1.0, 1, 0.0, 5.0, 0, 25.0, 1.0),
    ];
    let normalizer = Normalizer::fit(&players).unwrap();
    let low = normalizer.normalized(Feature::Ownership, &players[0]);
    let mid = normalizer.normalized(Feature::Ownership, &players[2]);
    let high = normalizer.normalized(Feature::Ownership, &players[1]);
    assert!(low >= mid && mid >= high);
    assert_eq!(low, 1.0);
    assert_eq!(high, 0.0);

    // The negative weight then applies on top of the inversion.
    let weights = Weights::default();
    assert_eq!(normalizer.contributions(&weights, &players[0])[6], -0.05);
    assert_eq!(normalizer.contributions(&weights, &players[1])[6], 0.0);
}

#[test]
fn alternate_weights_are_honoured() {
    let config = ScoringConfig {
        weights: Weights {
            form: 0.0,
            ppg: 0.0,
            fixture_ease: 0.0,
            xgi_per90: 0.0,
            ict_index: 0.0,
            bonus: 1.0,
            ownership: 0.0,
        },
        ..ScoringConfig::default()
    };
    let players = vec![
        player(1, 9.0, 9.0, 5, 0.9, 90.0, 0, 10.0, 1.0),
        player(2, 1.0, 1.0, 1, 0.1, 10.0, 4, 10.0, 1.0),
    ];
    let scored = score_players_with(&players, &config);
    assert_eq!(scored[0].player.id, 2);
    assert_eq!(scored[0].score, 100.0);
    assert_eq!(scored[1].score, 0.0);
}

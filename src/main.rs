use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use fpl_scout::config::AppConfig;
use fpl_scout::logging::init_logging;
use fpl_scout::model::{Position, ScoredRecord};
use fpl_scout::recommend::{RecommendationQuery, get_recommendations};
use fpl_scout::report::{export_file_name, render_table, write_csv, write_xlsx};
use fpl_scout::scoring::ScoringConfig;
use fpl_scout::source::{
    FileSource, HttpSource, SnapshotSource, fetch_player_history, load_snapshot,
};

const PER_POSITION_TOP_N: usize = 5;

#[derive(Debug, Default)]
struct CliArgs {
    position: Option<Position>,
    max_price: Option<f64>,
    top_n: Option<usize>,
    snapshot_dir: Option<PathBuf>,
    csv_path: Option<PathBuf>,
    no_csv: bool,
    xlsx_path: Option<PathBuf>,
    history: Option<u32>,
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log_filter, config.log_format)?;
    let args = parse_args(std::env::args().skip(1).collect())?;

    let source: Box<dyn SnapshotSource> = match args.snapshot_dir.as_ref() {
        Some(dir) => {
            info!(dir = %dir.display(), "reading saved snapshot");
            Box::new(FileSource::new(dir))
        }
        None => {
            info!(base_url = %config.base_url, "fetching FPL data");
            Box::new(HttpSource::new(&config.base_url, config.timeout)?)
        }
    };

    if let Some(player_id) = args.history {
        return print_history(source.as_ref(), player_id);
    }

    let snapshot = load_snapshot(source.as_ref())?;
    let ranking = fpl_scout::rank_snapshot(&snapshot, &ScoringConfig::default());
    let gw = ranking.current_gw;

    println!("{}", "=".repeat(60));
    println!("  FPL SCOUT - GW {gw} Recommendations");
    println!("{}", "=".repeat(60));

    let top_n = args.top_n.unwrap_or(config.top_n);
    if args.position.is_some() || args.max_price.is_some() {
        let mut query = RecommendationQuery::new(top_n);
        query.position = args.position;
        query.max_price = args.max_price;
        print_section(&describe(&query), &ranking.ranked, &query);
    } else {
        for position in Position::ALL {
            let query = RecommendationQuery::new(PER_POSITION_TOP_N).position(position);
            print_section(&format!("TOP {position}s"), &ranking.ranked, &query);
        }
        print_section("TOP OVERALL", &ranking.ranked, &RecommendationQuery::new(top_n));
    }

    if !args.no_csv {
        let path = args
            .csv_path
            .clone()
            .unwrap_or_else(|| config.export_dir.join(export_file_name(gw)));
        let rows = write_csv(&path, &ranking.ranked)?;
        println!("Saved: {} ({rows} players)", path.display());
    }
    if let Some(path) = args.xlsx_path.as_ref() {
        write_xlsx(path, gw, &ranking.ranked)?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}

fn print_section(title: &str, ranked: &[ScoredRecord], query: &RecommendationQuery) {
    let rows = get_recommendations(ranked, query);
    println!("-- {title} --");
    if rows.is_empty() {
        println!("(no players match)");
    } else {
        print!("{}", render_table(rows));
    }
    println!();
}

fn describe(query: &RecommendationQuery) -> String {
    let mut parts = vec![format!("TOP {}", query.top_n)];
    if let Some(position) = query.position {
        parts.push(position.to_string());
    }
    if let Some(max_price) = query.max_price {
        parts.push(format!("<= {max_price:.1}m"));
    }
    parts.join(" ")
}

fn print_history(source: &dyn SnapshotSource, player_id: u32) -> Result<()> {
    let history = fetch_player_history(source, player_id)?;
    if history.history.is_empty() {
        warn!(player_id, "no gameweek history returned");
    }
    println!("Player {player_id}: {} gameweeks", history.history.len());
    println!("{:>3} {:>6} {:>7} {:>4} {:>4}", "gw", "points", "minutes", "opp", "home");
    for row in &history.history {
        println!(
            "{:>3} {:>6} {:>7} {:>4} {:>4}",
            row.round,
            row.total_points,
            row.minutes,
            row.opponent_team,
            if row.was_home { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        if flag == "--no-csv" {
            out.no_csv = true;
            continue;
        }
        let mut value = || -> Result<String> {
            inline
                .clone()
                .or_else(|| iter.next())
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--position" => out.position = Some(value()?.parse()?),
            "--max-price" => {
                let raw = value()?;
                let max_price = raw
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid --max-price {raw:?}"))?;
                if !max_price.is_finite() {
                    return Err(anyhow!("invalid --max-price {raw:?}: must be a finite number"));
                }
                out.max_price = Some(max_price);
            }
            "--top" => {
                let raw = value()?;
                out.top_n = Some(
                    raw.trim()
                        .parse::<usize>()
                        .with_context(|| format!("invalid --top {raw:?}"))?,
                );
            }
            "--snapshot" => out.snapshot_dir = Some(PathBuf::from(value()?)),
            "--csv" => out.csv_path = Some(PathBuf::from(value()?)),
            "--xlsx" => out.xlsx_path = Some(PathBuf::from(value()?)),
            "--history" => {
                let raw = value()?;
                out.history = Some(
                    raw.trim()
                        .parse::<u32>()
                        .with_context(|| format!("invalid --history {raw:?}"))?,
                );
            }
            _ => return Err(anyhow!("unknown argument {flag}")),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_filters_in_both_flag_forms() {
        let parsed = parse_args(args(&["--position", "mid", "--max-price=7.5", "--top", "3"])).unwrap();
        assert_eq!(parsed.position, Some(Position::Midfielder));
        assert_eq!(parsed.max_price, Some(7.5));
        assert_eq!(parsed.top_n, Some(3));
    }

    #[test]
    fn non_finite_max_price_is_rejected() {
        for bad in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(parse_args(args(&["--max-price", bad])).is_err(), "{bad}");
        }
    }

    #[test]
    fn unknown_position_is_rejected() {
        assert!(parse_args(args(&["--position", "ST"])).is_err());
    }
}

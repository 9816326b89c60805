use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::http_client::http_client;
use crate::model::{Bootstrap, Fixture, HistoryRow, PlayerHistory};

pub const FPL_API_BASE: &str = "https://fantasy.premierleague.com/api/";

/// Raw league data for one run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub bootstrap: Bootstrap,
    pub fixtures: Vec<Fixture>,
}

/// Where raw JSON comes from. Every call returns the response body verbatim.
pub trait SnapshotSource {
    fn bootstrap(&self) -> Result<String>;
    fn fixtures(&self) -> Result<String>;
    fn element_summary(&self, player_id: u32) -> Result<String>;
}

pub struct HttpSource {
    client: &'static Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            client: http_client(timeout)?,
            base_url,
        })
    }

    fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} from {url}: {body}"));
        }
        Ok(body)
    }
}

impl SnapshotSource for HttpSource {
    fn bootstrap(&self) -> Result<String> {
        self.get("bootstrap-static/")
    }

    fn fixtures(&self) -> Result<String> {
        self.get("fixtures/")
    }

    fn element_summary(&self, player_id: u32) -> Result<String> {
        self.get(&format!("element-summary/{player_id}/"))
    }
}

/// Saved snapshot directory: `bootstrap.json`, `fixtures.json` and
/// optionally `element-summary-{id}.json`.
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> Result<String> {
        read_file(&self.dir.join(name))
    }
}

impl SnapshotSource for FileSource {
    fn bootstrap(&self) -> Result<String> {
        self.read("bootstrap.json")
    }

    fn fixtures(&self) -> Result<String> {
        self.read("fixtures.json")
    }

    fn element_summary(&self, player_id: u32) -> Result<String> {
        self.read(&format!("element-summary-{player_id}.json"))
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn load_snapshot(source: &dyn SnapshotSource) -> Result<Snapshot> {
    let bootstrap = parse_bootstrap_json(&source.bootstrap()?)?;
    let fixtures = parse_fixtures_json(&source.fixtures()?)?;
    info!(
        players = bootstrap.elements.len(),
        teams = bootstrap.teams.len(),
        fixtures = fixtures.len(),
        "loaded snapshot"
    );
    Ok(Snapshot {
        bootstrap,
        fixtures,
    })
}

pub fn fetch_player_history(source: &dyn SnapshotSource, player_id: u32) -> Result<PlayerHistory> {
    let body = source.element_summary(player_id)?;
    let mut history = parse_element_summary_json(&body)?;
    history.player_id = player_id;
    Ok(history)
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Bootstrap> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Bootstrap::default());
    }
    serde_json::from_str(trimmed).context("invalid bootstrap json")
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid fixtures json")
}

#[derive(Debug, Deserialize)]
struct ElementSummary {
    #[serde(default)]
    history: Vec<HistoryRow>,
}

pub fn parse_element_summary_json(raw: &str) -> Result<PlayerHistory> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(PlayerHistory::default());
    }
    let summary: ElementSummary =
        serde_json::from_str(trimmed).context("invalid element-summary json")?;
    Ok(PlayerHistory {
        player_id: 0,
        history: summary.history,
    })
}

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::source::FPL_API_BASE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Runtime settings read from the environment (`.env.local`, `.env`, process env).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub top_n: usize,
    pub export_dir: PathBuf,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let base_url = opt_env("FPL_BASE_URL").unwrap_or_else(|| FPL_API_BASE.to_string());
        let timeout_secs = env::var("FPL_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(15)
            .clamp(1, 120);
        let top_n = env::var("FPL_TOP_N")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(10)
            .clamp(1, 100);
        let export_dir = opt_env("FPL_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_filter = opt_env("FPL_LOG")
            .or_else(|| opt_env("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = match opt_env("FPL_LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            top_n,
            export_dir,
            log_filter,
            log_format,
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

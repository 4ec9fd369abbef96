//! quakefetch configuration stored in `quakefetch.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::io::session::SessionOptions;

pub const DEFAULT_CONFIG_FILE: &str = "quakefetch.toml";
pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

const DEFAULT_BACKFILL_START: NaiveDate = match NaiveDate::from_ymd_opt(2001, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default backfill start"),
};
const DEFAULT_BACKFILL_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 22) {
    Some(date) => date,
    None => panic!("invalid default backfill end"),
};

/// quakefetch configuration (TOML).
///
/// Every field is optional in the file; CLI flags override what is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuakeConfig {
    /// Catalog query endpoint.
    pub base_url: String,

    /// Directory receiving artifacts.
    pub output_dir: PathBuf,

    /// Per-request timeout in seconds (connect through body read).
    pub request_timeout_secs: u64,

    pub user_agent: String,

    pub backfill: BackfillConfig,
}

/// Default interval for `--monthly` when no bounds are given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackfillConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_BACKFILL_START,
            end: DEFAULT_BACKFILL_END,
        }
    }
}

impl Default for QuakeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("dataset").join("raw"),
            request_timeout_secs: 120,
            user_agent: format!("quakefetch/{}", env!("CARGO_PKG_VERSION")),
            backfill: BackfillConfig::default(),
        }
    }
}

impl QuakeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base_url must be non-empty"));
        }
        Url::parse(&self.base_url).with_context(|| format!("invalid base_url {}", self.base_url))?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output_dir must be non-empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        if self.backfill.start >= self.backfill.end {
            return Err(anyhow!(
                "backfill.start ({}) must be before backfill.end ({})",
                self.backfill.start,
                self.backfill.end
            ));
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `QuakeConfig::default()`.
pub fn load_config(path: &Path) -> Result<QuakeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file missing, using defaults");
        let cfg = QuakeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: QuakeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    debug!(path = %path.display(), base_url = %cfg.base_url, "config loaded");
    Ok(cfg)
}

//! `config.toml` loading and validation.
//!
//! The file is read once at startup. The session cookie may be supplied through
//! the `ROLI_VERIFICATION` environment variable instead of the file.
use crate::scheduler::MIN_INTERVAL;
use crate::trader::AdSettings;
use common::AssetId;
use rolimons::RequestTag;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

pub(crate) const COOKIE_ENV: &str = "ROLI_VERIFICATION";
const DEFAULT_INTERVAL_MINUTES: u64 = 15;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Config file {0} not found")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing '{0}' in config")]
    Missing(&'static str),
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawConfig {
    user_id: Option<i64>,
    roli_verification: Option<String>,
    #[serde(default)]
    offer_item_ids: Vec<AssetId>,
    #[serde(default)]
    trade_ad: TradeAdSection,
    #[serde(default)]
    automation: AutomationSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
struct TradeAdSection {
    #[serde(default)]
    request_tags: Vec<RequestTag>,
    #[serde(default)]
    request_item_ids: Vec<AssetId>,
    #[serde(default)]
    dry_run: bool,
}

#[derive(Debug, Deserialize)]
struct AutomationSection {
    #[serde(default = "default_interval")]
    interval_minutes: u64,
    #[serde(default)]
    run_once: bool,
}

impl Default for AutomationSection {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            run_once: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoggingSection {
    #[serde(default = "default_level")]
    level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_level() -> String {
    "info".to_string()
}

impl RawConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Checks required fields. A non-empty `cookie_override` replaces the file's cookie.
    pub fn validate(self, cookie_override: Option<String>) -> Result<Config, ConfigError> {
        let user_id = self
            .user_id
            .filter(|id| *id > 0)
            .ok_or(ConfigError::Missing("user_id"))?;

        let roli_verification = cookie_override
            .filter(|cookie| !cookie.trim().is_empty())
            .or(self.roli_verification)
            .map(|cookie| cookie.trim().to_string())
            .filter(|cookie| !cookie.is_empty())
            .ok_or(ConfigError::Missing("roli_verification"))?;

        if self.offer_item_ids.is_empty() {
            return Err(ConfigError::Missing("offer_item_ids"));
        }

        let mut request_tags = Vec::with_capacity(self.trade_ad.request_tags.len());
        for tag in self.trade_ad.request_tags {
            if !request_tags.contains(&tag) {
                request_tags.push(tag);
            }
        }
        if request_tags.is_empty() {
            return Err(ConfigError::Missing("trade_ad.request_tags"));
        }

        Ok(Config {
            user_id,
            roli_verification,
            offer_item_ids: self.offer_item_ids,
            request_tags,
            request_item_ids: self.trade_ad.request_item_ids,
            dry_run: self.trade_ad.dry_run,
            interval_minutes: self.automation.interval_minutes,
            run_once: self.automation.run_once,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub user_id: i64,
    pub roli_verification: String,
    pub offer_item_ids: Vec<AssetId>,
    pub request_tags: Vec<RequestTag>,
    pub request_item_ids: Vec<AssetId>,
    pub dry_run: bool,
    pub interval_minutes: u64,
    pub run_once: bool,
}

impl Config {
    /// Posting interval, never below the 15 minute Rolimons cooldown.
    pub fn interval(&self) -> Duration {
        self.configured_interval().max(MIN_INTERVAL)
    }

    pub fn interval_below_minimum(&self) -> bool {
        self.configured_interval() < MIN_INTERVAL
    }

    fn configured_interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn ad_settings(&self, force_dry_run: bool) -> AdSettings {
        AdSettings {
            user_id: self.user_id,
            roli_verification: self.roli_verification.clone(),
            offer_item_ids: self.offer_item_ids.clone(),
            request_tags: self.request_tags.clone(),
            request_item_ids: self.request_item_ids.clone(),
            dry_run: force_dry_run || self.dry_run,
        }
    }
}

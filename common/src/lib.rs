use derive_more::{Display, From, Into};
use env_logger::{Builder, Env};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Platform asset identifier. Several owned copies of one limited share the same id.
#[derive(
    Debug, Display, From, Into, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(pub i64);

/// Loads `.env` and initialises the logger.
///
/// `RUST_LOG` takes precedence over `default_level`. An unknown level falls back to info.
pub fn setup_env(default_level: &str) {
    dotenvy::dotenv().ok();
    let level = parse_level(default_level);
    Builder::new()
        .filter_level(level.unwrap_or(LevelFilter::Info))
        .parse_env(Env::default())
        .init();

    if level.is_none() {
        log::warn!("Unknown log level {default_level:?}, using info");
    }
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

//! Process configuration, read from the environment (and `.env` if present).

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SYNC_INTERVAL_MS: u64 = 2500;
const DEFAULT_EDIT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAX_EVENT_REFRESHES: usize = 16;
const DEFAULT_BOT_DATA_PATH: &str = "botdata.json";
const DEFAULT_VOLUME: f32 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Period of the control panel refresh tick.
    pub sync_interval: Duration,
    /// Upper bound on reading a player and on a single control message edit.
    pub edit_timeout: Duration,
    /// How many track-end refreshes may run at once.
    pub max_event_refreshes: usize,
    pub bot_data_path: PathBuf,
    /// Volume applied when the bot joins a voice channel, 1.0 being 100%.
    pub default_volume: f32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let sync_interval_ms: u64 = parse_positive(
            &lookup,
            "CONTROL_SYNC_INTERVAL_MS",
            DEFAULT_SYNC_INTERVAL_MS,
        )?;

        let edit_timeout_ms: u64 =
            parse_positive(&lookup, "CONTROL_EDIT_TIMEOUT_MS", DEFAULT_EDIT_TIMEOUT_MS)?;

        let max_event_refreshes: usize = parse_positive(
            &lookup,
            "CONTROL_MAX_EVENT_REFRESHES",
            DEFAULT_MAX_EVENT_REFRESHES,
        )?;

        let default_volume: f32 = parse_or(&lookup, "DEFAULT_VOLUME", DEFAULT_VOLUME)?;
        if !(0.0..=1.5).contains(&default_volume) {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_VOLUME",
                value: default_volume.to_string(),
            });
        }

        let bot_data_path = lookup("BOT_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BOT_DATA_PATH));

        Ok(Self {
            discord_token,
            sync_interval: Duration::from_millis(sync_interval_ms),
            edit_timeout: Duration::from_millis(edit_timeout_ms),
            max_event_refreshes,
            bot_data_path,
            default_volume,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Like [`parse_or`], but zero is rejected as well.
fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq + ToString,
{
    let value = parse_or(lookup, name, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

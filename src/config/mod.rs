use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Runtime settings, read once at startup and handed to whoever needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub football_data_key: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
    pub fallback_dir: PathBuf,
    pub recent_match_limit: u32,
    pub match_simulations: u32,
    pub name_simulations: u32,
    pub simulation_seed: Option<u64>,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            football_data_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            fallback_dir: PathBuf::from("."),
            recent_match_limit: 8,
            match_simulations: 1200,
            name_simulations: 3000,
            simulation_seed: None,
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            football_data_key: text("FOOTBALL_DATA_KEY"),
            base_url: text("FOOTBALL_DATA_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout: parse(&lookup, "PROVIDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            fallback_dir: text("FALLBACK_DIR").map(PathBuf::from).unwrap_or(defaults.fallback_dir),
            recent_match_limit: parse(&lookup, "RECENT_MATCH_LIMIT")?.unwrap_or(defaults.recent_match_limit),
            match_simulations: parse(&lookup, "PREDICT_SIMULATIONS")?.unwrap_or(defaults.match_simulations),
            name_simulations: parse(&lookup, "NAME_PREDICT_SIMULATIONS")?.unwrap_or(defaults.name_simulations),
            simulation_seed: parse(&lookup, "SIMULATION_SEED")?,
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
        };

        if config.match_simulations == 0 {
            return Err(ConfigError::Zero("PREDICT_SIMULATIONS"));
        }
        if config.name_simulations == 0 {
            return Err(ConfigError::Zero("NAME_PREDICT_SIMULATIONS"));
        }
        if config.recent_match_limit == 0 {
            return Err(ConfigError::Zero("RECENT_MATCH_LIMIT"));
        }

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(None),
    }
}

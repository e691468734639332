//! Runtime configuration.
//!
//! Resolved once at startup from the environment (after loading `.env`) and
//! passed into the application. Nothing reads environment variables after
//! this point.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LOG_FILE: &str = "clinica-admin.log";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;
const DEFAULT_NOTICE_SECS: u64 = 5;
const DEFAULT_TICK_RATE: f64 = 30.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http:// or https:// URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a positive number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    api_url: String,
    log_file: PathBuf,
    redirect_delay: Duration,
    notice_ttl: Duration,
    tick_rate: f64,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves the configuration from `lookup`, which maps a variable name
    /// to its value. Unset and empty variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_url = match get("CLINICA_API_URL") {
            Some(url) => parse_url("CLINICA_API_URL", &url)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let log_file = get("CLINICA_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        let redirect_delay = Duration::from_millis(parse_number(
            "CLINICA_REDIRECT_DELAY_MS",
            get("CLINICA_REDIRECT_DELAY_MS"),
            DEFAULT_REDIRECT_DELAY_MS,
        )?);
        let notice_ttl = Duration::from_secs(parse_number(
            "CLINICA_NOTICE_SECS",
            get("CLINICA_NOTICE_SECS"),
            DEFAULT_NOTICE_SECS,
        )?);
        let tick_rate = match get("CLINICA_TICK_RATE") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "CLINICA_TICK_RATE",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TICK_RATE,
        };

        Ok(Self {
            api_url,
            log_file,
            redirect_delay,
            notice_ttl,
            tick_rate,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Delay between a successful save and the return to the list.
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    pub fn notice_ttl(&self) -> Duration {
        self.notice_ttl
    }

    /// Frames per second of the UI loop.
    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            notice_ttl: Duration::from_secs(DEFAULT_NOTICE_SECS),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() => Ok(url.to_string()),
        _ => Err(ConfigError::InvalidUrl {
            var,
            value: raw.to_string(),
        }),
    }
}

fn parse_number(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidNumber { var, value: raw }),
        None => Ok(default),
    }
}

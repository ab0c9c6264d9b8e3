use crate::domain::{clock::hhmm, parse_hhmm};
use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(4, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// A malformed cutoff keeps the rest of the file usable
fn lenient_cutoff<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(parse_hhmm(&raw).unwrap_or_else(|e| {
        warn!("{}, using 04:00", e);
        default_cutoff()
    }))
}

fn default_tick_ms() -> u64 {
    250
}

/// Backoff settings for the generative endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "RetryConfig::default_attempts")]
    pub max_attempts: u32,
    #[serde(default = "RetryConfig::default_base_delay")]
    pub base_delay_ms: u64,
    #[serde(default = "RetryConfig::default_jitter")]
    pub max_jitter_ms: u64,
}

impl RetryConfig {
    fn default_attempts() -> u32 {
        3
    }

    fn default_base_delay() -> u64 {
        1000
    }

    fn default_jitter() -> u64 {
        1000
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_attempts(),
            base_delay_ms: Self::default_base_delay(),
            max_jitter_ms: Self::default_jitter(),
        }
    }
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Starts before this time sort after the evening
    #[serde(
        default = "default_cutoff",
        serialize_with = "hhmm::serialize",
        deserialize_with = "lenient_cutoff"
    )]
    pub night_carry_cutoff: NaiveTime,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_timeout(),
            retry: RetryConfig::default(),
            night_carry_cutoff: default_cutoff(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    /// Load from `path` (missing or broken file means defaults), then apply the environment
    pub fn load(path: &Path) -> Self {
        let config = match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring config file: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Apply TABI_* overrides; the build-time key is the last fallback
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("TABI_API_KEY") {
            self.api_key = Some(key);
        }
        if self.api_key.is_none() {
            self.api_key = option_env!("TABI_API_KEY").map(str::to_string);
        }
        if let Some(model) = non_empty("TABI_MODEL") {
            self.model = model;
        }
        if let Some(cutoff) = non_empty("TABI_NIGHT_CUTOFF") {
            match parse_hhmm(&cutoff) {
                Ok(time) => self.night_carry_cutoff = time,
                Err(e) => warn!("ignoring TABI_NIGHT_CUTOFF: {}", e),
            }
        }
        self
    }

    pub fn night_cutoff(&self) -> NaiveTime {
        self.night_carry_cutoff
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(16))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

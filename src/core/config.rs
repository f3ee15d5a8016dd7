//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with token, store path, prefix, relay label and timeouts

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "characters.json";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_WEBHOOK_LABEL: &str = "Echo";
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub data_path: PathBuf,
    pub command_prefix: String,
    /// Reserved name carried by the webhook used to relay persona messages
    pub webhook_label: String,
    pub gateway_timeout: Duration,
    pub shutdown_grace: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let gateway_timeout_secs = parse_secs(
            get("GATEWAY_TIMEOUT_SECS"),
            "GATEWAY_TIMEOUT_SECS",
            DEFAULT_GATEWAY_TIMEOUT_SECS,
        )?;
        if gateway_timeout_secs == 0 {
            return Err(anyhow!("GATEWAY_TIMEOUT_SECS must be greater than zero"));
        }
        let shutdown_grace_secs = parse_secs(
            get("SHUTDOWN_GRACE_SECS"),
            "SHUTDOWN_GRACE_SECS",
            DEFAULT_SHUTDOWN_GRACE_SECS,
        )?;

        Ok(Config {
            discord_token,
            data_path: get("PERSONA_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            command_prefix: get("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            webhook_label: get("RELAY_WEBHOOK_LABEL")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_LABEL.to_string()),
            gateway_timeout: Duration::from_secs(gateway_timeout_secs),
            shutdown_grace: Duration::from_secs(shutdown_grace_secs),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        Some(value) => value
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds, got '{value}'")),
        None => Ok(default),
    }
}

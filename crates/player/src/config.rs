//! Player configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::application::services::{GameSettings, PollPolicy};

/// Player configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Backend base URL, including the `/api/v1` prefix
    pub api_url: String,
    /// Per-request timeout for the HTTP adapter. `None` disables it.
    pub http_timeout: Option<Duration>,
    /// Seed for commentary and personality draws
    pub seed: Option<u64>,
    /// Snapshot file. `None` uses the platform config directory.
    pub storage_path: Option<PathBuf>,
    pub game: GameSettings,
}

impl PlayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GameSettings::default();

        let http_timeout_secs: u64 = var("STAMPALOOZA_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .trim()
            .parse()
            .context("STAMPALOOZA_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        let thinking_ms: u64 = match var("STAMPALOOZA_THINKING_MS") {
            Some(v) => v
                .trim()
                .parse()
                .context("STAMPALOOZA_THINKING_MS must be a whole number of milliseconds")?,
            None => defaults.thinking_delay.as_millis() as u64,
        };

        let seed = var("STAMPALOOZA_SEED")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("STAMPALOOZA_SEED must be an unsigned integer")?;

        let spending_limit = var("STAMPALOOZA_SPENDING_LIMIT")
            .map(|v| v.trim().parse::<f64>())
            .transpose()
            .context("STAMPALOOZA_SPENDING_LIMIT must be a number")?;
        if let Some(limit) = spending_limit {
            if !limit.is_finite() || limit < 0.0 {
                bail!("STAMPALOOZA_SPENDING_LIMIT must be a non-negative amount");
            }
        }

        let image_policy = match var("STAMPALOOZA_IMAGE_POLICY") {
            Some(v) => parse_policy(&v)?,
            None => defaults.image_policy,
        };

        let generate_images = match var("STAMPALOOZA_GENERATE_IMAGES") {
            Some(v) => parse_bool(&v).context("STAMPALOOZA_GENERATE_IMAGES must be true or false")?,
            None => defaults.generate_images,
        };

        Ok(Self {
            api_url: var("STAMPALOOZA_API_URL")
                .unwrap_or_else(|| "http://localhost:8000/api/v1".to_string()),
            http_timeout: (http_timeout_secs > 0).then_some(Duration::from_secs(http_timeout_secs)),
            seed,
            storage_path: var("STAMPALOOZA_STORAGE_PATH").map(PathBuf::from),
            game: GameSettings {
                thinking_delay: Duration::from_millis(thinking_ms),
                fallback_image: var("STAMPALOOZA_FALLBACK_IMAGE").unwrap_or(defaults.fallback_image),
                generate_images,
                image_policy,
                spending_limit,
            },
        })
    }
}

fn parse_policy(value: &str) -> Result<PollPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "status" => Ok(PollPolicy::status_polling()),
        "reveal" => Ok(PollPolicy::reveal_retry()),
        other => bail!("STAMPALOOZA_IMAGE_POLICY must be 'status' or 'reveal', got '{}'", other),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<PlayerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlayerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]).expect("defaults");
        assert_eq!(config.api_url, "http://localhost:8000/api/v1");
        assert_eq!(config.http_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.seed, None);
        assert_eq!(config.storage_path, None);
        assert_eq!(config.game, GameSettings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("STAMPALOOZA_API_URL", "https://scoops.example/api/v1"),
            ("STAMPALOOZA_HTTP_TIMEOUT_SECS", "0"),
            ("STAMPALOOZA_THINKING_MS", "10"),
            ("STAMPALOOZA_SEED", "42"),
            ("STAMPALOOZA_STORAGE_PATH", "/tmp/stampalooza.json"),
            ("STAMPALOOZA_FALLBACK_IMAGE", "cone.png"),
            ("STAMPALOOZA_SPENDING_LIMIT", "12.5"),
            ("STAMPALOOZA_IMAGE_POLICY", "Reveal"),
            ("STAMPALOOZA_GENERATE_IMAGES", "off"),
        ])
        .expect("config");

        assert_eq!(config.api_url, "https://scoops.example/api/v1");
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/stampalooza.json")));
        assert_eq!(config.game.thinking_delay, Duration::from_millis(10));
        assert_eq!(config.game.fallback_image, "cone.png");
        assert_eq!(config.game.spending_limit, Some(12.5));
        assert_eq!(config.game.image_policy, PollPolicy::reveal_retry());
        assert!(!config.game.generate_images);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("STAMPALOOZA_API_URL", "  "), ("STAMPALOOZA_SEED", "")])
            .expect("config");
        assert_eq!(config.api_url, "http://localhost:8000/api/v1");
        assert_eq!(config.seed, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("STAMPALOOZA_SEED", "lucky")]).is_err());
        assert!(config(&[("STAMPALOOZA_SPENDING_LIMIT", "-1")]).is_err());
        assert!(config(&[("STAMPALOOZA_IMAGE_POLICY", "forever")]).is_err());
        assert!(config(&[("STAMPALOOZA_GENERATE_IMAGES", "maybe")]).is_err());
        assert!(config(&[("STAMPALOOZA_HTTP_TIMEOUT_SECS", "soon")]).is_err());
    }
}

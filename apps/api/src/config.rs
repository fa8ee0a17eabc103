use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::criteria::ScoringConfig;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// JSON file overriding the default criterion weights and rating thresholds.
    pub scoring_config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            scoring_config_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT)
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            scoring_config_path: std::env::var("SCORING_CONFIG")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Weights and thresholds: the file named by `SCORING_CONFIG`, or the
    /// built-in defaults.
    pub fn load_scoring(&self) -> Result<ScoringConfig> {
        match &self.scoring_config_path {
            Some(path) => load_scoring_file(path),
            None => Ok(ScoringConfig::default()),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

fn load_scoring_file(path: &Path) -> Result<ScoringConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scoring config '{}'", path.display()))?;
    ScoringConfig::from_json_str(&raw)
        .with_context(|| format!("invalid scoring config '{}'", path.display()))
}

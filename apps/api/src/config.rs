use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Postgres for the job-description store. Falls back to an in-process store when unset.
    pub database_url: Option<String>,
    pub chromium_path: String,
    pub generation_retry_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            database_url: optional_env("DATABASE_URL"),
            chromium_path: optional_env("CHROMIUM_PATH").unwrap_or_else(|| "chromium".to_string()),
            generation_retry_delay_ms: optional_env("GENERATION_RETRY_DELAY_MS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("GENERATION_RETRY_DELAY_MS must be a number of milliseconds")?
                .unwrap_or(500),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.generation_retry_delay_ms)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

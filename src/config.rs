//! Client configuration loaded from environment variables.
//!
//! Mirrors the frontend build environment: the API base URL is mandatory in
//! production and falls back to a local backend during development.

use std::env;
use std::path::PathBuf;

/// Local backend used when no API URL is configured outside production.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default location of the persisted session file.
pub const DEFAULT_SESSION_FILE: &str = ".notes-exchange/session.json";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the NotesExchange REST API (no trailing slash)
    pub api_base_url: String,
    /// Production mode disables request/response logging
    pub production: bool,
    /// Where the CLI persists tokens between runs
    pub session_file: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            production: false,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let production = env::var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let api_base_url = match env::var("NOTES_EXCHANGE_API_URL") {
            Ok(url) if !url.trim().is_empty() => normalize_base_url(&url),
            _ if production => return Err(ConfigError::Missing("NOTES_EXCHANGE_API_URL")),
            _ => DEFAULT_API_URL.to_string(),
        };

        let session_file = env::var("NOTES_EXCHANGE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        Ok(Self {
            api_base_url,
            production,
            session_file,
        })
    }

    /// Whether HTTP traffic should be logged (development only).
    pub fn log_http(&self) -> bool {
        !self.production
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and injected into every component that needs it.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// OAuth redirect URI registered with Strava
    pub redirect_uri: String,
    /// Webhook verification token (shared with the subscription)
    pub webhook_verify_token: String,
    /// Base URL of the Strava REST API
    pub strava_api_url: String,
    /// Base URL of the Strava OAuth endpoints
    pub strava_oauth_url: String,

    // --- Notion ---
    pub notion_api_key: String,
    pub notion_database_id: String,
    pub notion_api_url: String,

    // --- Supabase (credential store) ---
    /// When unset, credentials are kept in memory.
    pub supabase: Option<SupabaseConfig>,

    // --- Activity fetch retry ---
    pub fetch_max_attempts: u32,
    pub fetch_initial_delay: Duration,

    /// Server port
    pub port: u16,
}

/// Connection details for the Supabase REST API.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com";
pub const DEFAULT_FETCH_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_FETCH_INITIAL_DELAY_MS: u64 = 2000;

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:8080/auth/callback".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            strava_oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            notion_api_key: "test_notion_key".to_string(),
            notion_database_id: "test_database_id".to_string(),
            notion_api_url: DEFAULT_NOTION_API_URL.to_string(),
            supabase: None,
            fetch_max_attempts: DEFAULT_FETCH_MAX_ATTEMPTS,
            fetch_initial_delay: Duration::from_millis(DEFAULT_FETCH_INITIAL_DELAY_MS),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let supabase = match (env::var("SUPABASE_URL"), env::var("SUPABASE_KEY")) {
            (Ok(url), Ok(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key: key.trim().to_string(),
            }),
            (Ok(_), Err(_)) => return Err(ConfigError::Missing("SUPABASE_KEY")),
            _ => None,
        };

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            redirect_uri: env::var("REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/auth/callback".to_string()),
            webhook_verify_token: env::var("WEBHOOK_VERIFY_TOKEN")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| "STRAVA".to_string()),
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),

            notion_api_key: env::var("NOTION_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("NOTION_API_KEY"))?,
            notion_database_id: env::var("NOTION_DATABASE_ID")
                .map_err(|_| ConfigError::Missing("NOTION_DATABASE_ID"))?,
            notion_api_url: env::var("NOTION_API_URL")
                .unwrap_or_else(|_| DEFAULT_NOTION_API_URL.to_string()),

            supabase,

            fetch_max_attempts: env::var("FETCH_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_FETCH_MAX_ATTEMPTS),
            fetch_initial_delay: Duration::from_millis(
                env::var("FETCH_INITIAL_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_FETCH_INITIAL_DELAY_MS),
            ),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

//! Process configuration, read from flags or the environment.

use clap::Parser;
use gridjson_http::{SheetsAuth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use std::net::SocketAddr;
use std::time::Duration;

/// Default request body limit for uploads (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "gridjson-server")]
#[command(author, version, long_about = None)]
#[command(about = "Serve spreadsheets and uploaded files as JSON records")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "GRIDJSON_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Key clients must send in X-API-Key for /api/sheets (empty rejects all)
    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Google API key for public spreadsheets
    #[arg(long, env = "SHEETS_API_KEY", hide_env_values = true)]
    pub sheets_api_key: Option<String>,

    /// OAuth2 or service-account access token (takes precedence over the API key)
    #[arg(long, env = "SHEETS_ACCESS_TOKEN", hide_env_values = true)]
    pub sheets_access_token: Option<String>,

    /// Base URL of the Sheets API
    #[arg(long, env = "SHEETS_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub sheets_api_base: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "SHEETS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub sheets_timeout_secs: u64,

    /// Lifetime of cached sheet results in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached sheet results
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 128)]
    pub cache_capacity: usize,

    /// Requests per minute allowed per client IP (0 disables limiting)
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value_t = 30)]
    pub rate_limit_per_minute: u32,

    /// Rate-limit on X-Forwarded-For / X-Real-IP instead of the peer address
    #[arg(long, env = "TRUST_PROXY_HEADERS")]
    pub trust_proxy_headers: bool,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Drop all-blank columns from Google Sheets results too
    #[arg(long, env = "PRUNE_SHEET_COLUMNS")]
    pub prune_sheet_columns: bool,
}

impl Config {
    /// Upstream credentials; an access token wins over an API key.
    pub fn sheets_auth(&self) -> SheetsAuth {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(&self.sheets_access_token) {
            SheetsAuth::BearerToken(token)
        } else if let Some(key) = non_empty(&self.sheets_api_key) {
            SheetsAuth::ApiKey(key)
        } else {
            SheetsAuth::None
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

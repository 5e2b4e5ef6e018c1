//! Shared request state.

use crate::rate_limit::ClientRateLimiter;
use gridjson_core::SheetFetcher;
use std::sync::Arc;

/// Everything handlers and middleware need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<SheetFetcher>,
    /// Expected `X-API-Key` for `/api/sheets`.
    pub api_key: Arc<str>,
    /// `None` when rate limiting is disabled.
    pub limiter: Option<Arc<ClientRateLimiter>>,
    /// Key the limiter on `X-Forwarded-For`/`X-Real-IP` instead of the peer.
    pub trust_proxy_headers: bool,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(fetcher: SheetFetcher, api_key: &str, max_upload_bytes: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            api_key: Arc::from(api_key),
            limiter: None,
            trust_proxy_headers: false,
            max_upload_bytes,
        }
    }

    /// Limit each client IP to `per_minute` requests; 0 turns limiting off.
    #[must_use]
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        self.limiter = ClientRateLimiter::per_minute(per_minute).map(Arc::new);
        self
    }

    /// Only enable behind a reverse proxy that overwrites these headers.
    #[must_use]
    pub fn with_trusted_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }
}

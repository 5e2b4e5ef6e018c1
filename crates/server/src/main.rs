//! # gridjson-server
//!
//! HTTP server that turns Google Sheets ranges and uploaded CSV/XLSX files
//! into JSON records.

mod auth;
mod config;
mod error;
mod rate_limit;
mod routes;
mod state;

use anyhow::Context;
use clap::Parser;
use config::Config;
use gridjson_core::{FetchSettings, SheetFetcher, TtlCache};
use gridjson_http::SheetsClient;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let client = SheetsClient::with_options(
        &config.sheets_api_base,
        config.sheets_auth(),
        config.sheets_timeout_secs,
    )
    .context("failed to build Google Sheets client")?;

    let cache = Arc::new(TtlCache::new(config.cache_capacity, config.cache_ttl()));
    let settings = FetchSettings {
        prune_sheet_columns: config.prune_sheet_columns,
        ..FetchSettings::default()
    };
    let fetcher = SheetFetcher::new(Arc::new(client), cache, settings);

    let state = AppState::new(fetcher, &config.api_key, config.max_upload_bytes)
        .with_rate_limit(config.rate_limit_per_minute)
        .with_trusted_proxy_headers(config.trust_proxy_headers);
    if config.api_key.is_empty() {
        tracing::warn!("API_KEY is not set; /api/sheets will reject every request");
    }
    spawn_housekeeping(&state);

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        cache_capacity = config.cache_capacity,
        cache_ttl_secs = config.cache_ttl_secs,
        rate_limit_per_minute = config.rate_limit_per_minute,
        "gridjson-server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    Ok(())
}

/// Periodically drop expired cache entries and idle rate-limit buckets.
fn spawn_housekeeping(state: &AppState) {
    let fetcher = state.fetcher.clone();
    let limiter = state.limiter.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let purged = fetcher.cache().purge_expired();
            if let Some(limiter) = &limiter {
                limiter.retain_recent();
                tracing::debug!(clients = limiter.tracked_clients(), "rate limiter sweep");
            }
            if purged > 0 {
                tracing::debug!(purged, "purged expired cache entries");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

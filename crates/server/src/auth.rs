//! `X-API-Key` guard.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use gridjson_core::GridError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `X-API-Key` does not match the configured key.
///
/// An empty configured key matches nothing, so the guarded routes stay
/// closed until a key is set.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if state.api_key.is_empty() || supplied != &*state.api_key {
        tracing::debug!(path = %request.uri().path(), "rejected request without valid API key");
        return Err(GridError::unauthorized("Invalid API key").into());
    }

    Ok(next.run(request).await)
}

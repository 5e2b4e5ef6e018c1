//! JSON error responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gridjson_core::GridError;
use serde::{Deserialize, Serialize};

/// Body of every error response: `{"error": <kind>, "message": <text>}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// A [`GridError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GridError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GridError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GridError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GridError::ConversionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GridError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Rejection from the rate limiter.
#[derive(Debug)]
pub struct RateLimited {
    /// Whole seconds until the client may retry.
    pub retry_after: u64,
}

impl IntoResponse for RateLimited {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "rate_limited".to_string(),
            message: format!("Too many requests, retry in {}s", self.retry_after),
        };

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from_str(&self.retry_after.to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("60")),
        );
        response
    }
}

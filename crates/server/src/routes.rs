//! Router and request handlers.

use crate::auth::require_api_key;
use crate::error::ApiError;
use crate::rate_limit::rate_limit;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::StatusCode,
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use gridjson_core::GridError;
use gridjson_sheet::Record;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Records plus per-endpoint metadata.
#[derive(Debug, Serialize)]
pub struct DataResponse<M> {
    pub data: Vec<Record>,
    pub meta: M,
}

#[derive(Debug, Serialize)]
pub struct CacheMeta {
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct LinkMeta {
    pub spreadsheet_id: String,
    pub range: String,
    pub rows_returned: usize,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadMeta {
    pub rows: usize,
    /// Output column names, in order.
    pub columns: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetsQuery {
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertLinkRequest {
    #[serde(default)]
    pub sheet: String,
    pub range: Option<String>,
    /// `3` or `"3"`; anything else is ignored.
    pub header_row: Option<serde_json::Value>,
}

/// A 1-based header row from a JSON number or digit string.
fn header_row_from(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn body_too_large(limit: usize) -> GridError {
    GridError::payload_too_large(format!("Request body exceeds {limit} bytes"))
}

fn upload_error(err: &MultipartError, limit: usize) -> GridError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        body_too_large(limit)
    } else {
        GridError::bad_request(format!("Malformed upload: {err}"))
    }
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /api/sheets?spreadsheet_id=..&range=..`
pub async fn read_sheet(
    State(state): State<AppState>,
    Query(query): Query<SheetsQuery>,
) -> Result<Json<DataResponse<CacheMeta>>, ApiError> {
    let converted = state
        .fetcher
        .read_range(
            query.spreadsheet_id.as_deref().unwrap_or_default(),
            query.range.as_deref().unwrap_or_default(),
            None,
        )
        .await?;

    Ok(Json(DataResponse {
        data: converted.table.records,
        meta: CacheMeta {
            cached: converted.cached,
        },
    }))
}

/// `POST /convert_link` with `{sheet, range?, header_row?}`.
///
/// A body that is not a JSON object is treated as empty, which then fails
/// identifier resolution.
pub async fn convert_link(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DataResponse<LinkMeta>>, ApiError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(body_too_large(state.max_upload_bytes).into());
        }
        Err(_) => Bytes::new(),
    };
    let request: ConvertLinkRequest = serde_json::from_slice(&body).unwrap_or_default();
    let header_row = request.header_row.as_ref().and_then(header_row_from);

    let converted = state
        .fetcher
        .convert_link(&request.sheet, request.range.as_deref(), header_row)
        .await?;

    tracing::info!(
        spreadsheet_id = %converted.spreadsheet_id,
        range = %converted.range,
        rows = converted.table.records.len(),
        cached = converted.cached,
        "converted sheet link"
    );

    Ok(Json(DataResponse {
        meta: LinkMeta {
            spreadsheet_id: converted.spreadsheet_id,
            range: converted.range,
            rows_returned: converted.table.records.len(),
            cached: converted.cached,
        },
        data: converted.table.records,
    }))
}

/// `POST /convert` with a multipart `file` field.
pub async fn convert_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DataResponse<UploadMeta>>, ApiError> {
    let missing = || GridError::bad_request("Missing file");
    let limit = state.max_upload_bytes;
    let mut multipart = multipart.map_err(|_| missing())?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(&e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| upload_error(&e, limit))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or_else(missing)?;
    if filename.is_empty() {
        return Err(missing().into());
    }

    let fetcher = state.fetcher.clone();
    let converted = tokio::task::spawn_blocking(move || fetcher.convert_upload(&filename, &bytes))
        .await
        .map_err(|e| GridError::conversion_failed(format!("Conversion task failed: {e}")))??;

    Ok(Json(DataResponse {
        meta: UploadMeta {
            rows: converted.table.records.len(),
            columns: converted.table.headers,
        },
        data: converted.table.records,
    }))
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/api/sheets", get(read_sheet))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/convert_link", post(convert_link))
        .route("/convert", post(convert_file))
        .merge(guarded)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

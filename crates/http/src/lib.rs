//! # gridjson-http
//!
//! Google Sheets v4 REST client.
//!
//! Implements [`SheetSource`] on top of `reqwest`: `values.get` for cell
//! ranges and the spreadsheet resource for worksheet titles. Obtaining
//! credentials is the caller's job; the client only attaches what it is
//! given.

use async_trait::async_trait;
use gridjson_core::{SheetSource, SourceError};
use gridjson_sheet::Grid;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use std::time::Duration;

/// Public Google Sheets API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How requests are authorised upstream.
#[derive(Debug, Clone, Default)]
pub enum SheetsAuth {
    /// No credentials (only works against mocks or proxies).
    #[default]
    None,
    /// API key sent as the `key` query parameter; public sheets only.
    ApiKey(String),
    /// OAuth2 / service-account access token sent as a bearer token.
    BearerToken(String),
}

/// Google Sheets client.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    auth: SheetsAuth,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl SheetsClient {
    /// Constructs a client against the public API with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Http` if building the underlying HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridjson_http::{SheetsAuth, SheetsClient};
    /// let client = SheetsClient::new(SheetsAuth::ApiKey("k".into())).expect("client");
    /// ```
    pub fn new(auth: SheetsAuth) -> Result<Self, SourceError> {
        Self::with_options(DEFAULT_BASE_URL, auth, DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs a client for a custom endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn with_options(
        base_url: &str,
        auth: SheetsAuth,
        timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SourceError::Http(format!("invalid base URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Base URL with `segments` appended (each one percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SourceError::Http(format!("base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            SheetsAuth::None => request,
            SheetsAuth::ApiKey(key) => request.query(&[("key", key)]),
            SheetsAuth::BearerToken(token) => request.bearer_auth(token),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SourceError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse JSON: {e}")))
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn fetch_grid(&self, spreadsheet_id: &str, range: &str) -> Result<Grid, SourceError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", range])?;
        tracing::debug!(spreadsheet_id, range, "fetching sheet values");

        let body: ValueRange = self.get_json(self.client.get(url)).await?;
        Ok(Grid::from_json_rows(&body.values))
    }

    async fn list_sheet_names(&self, spreadsheet_id: &str) -> Result<Vec<String>, SourceError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id])?;
        tracing::debug!(spreadsheet_id, "listing worksheets");

        let request = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);
        let body: Spreadsheet = self.get_json(request).await?;
        Ok(body.sheets.into_iter().map(|s| s.properties.title).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        assert!(SheetsClient::new(SheetsAuth::None).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = SheetsClient::with_options("not a url", SheetsAuth::None, 5).unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            SheetsClient::with_options("http://localhost:9000/", SheetsAuth::None, 5).unwrap();
        let url = client
            .endpoint(&["v4", "spreadsheets", "abc", "values", "Q1 Sales!A1:B2"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v4/spreadsheets/abc/values/Q1%20Sales!A1:B2"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            SheetsClient::with_options("http://proxy.local/sheets", SheetsAuth::None, 5).unwrap();
        let url = client.endpoint(&["v4", "spreadsheets", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/sheets/v4/spreadsheets/abc");
    }

    #[test]
    fn test_auth_default() {
        assert!(matches!(SheetsAuth::default(), SheetsAuth::None));
    }
}

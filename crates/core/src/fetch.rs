//! Request orchestration: identifier -> cache -> upstream -> normalizer.

use crate::cache::TtlCache;
use crate::error::{GridError, GridResult};
use crate::identifier::resolve_spreadsheet_id;
use crate::source::SheetSource;
use gridjson_sheet::{normalize, DuplicateHeaders, Grid, NormalizeOptions, Normalized};
use std::sync::Arc;

/// Range used when a link conversion names no range: first 200 rows, A-Z.
pub const DEFAULT_BOUNDS: &str = "A1:Z200";

/// Behaviour knobs for [`SheetFetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Cell bounds appended to the auto-detected sheet name.
    pub default_bounds: String,
    /// Drop all-blank columns from Google Sheets results.
    pub prune_sheet_columns: bool,
    /// Collision policy for duplicate header names.
    pub duplicate_headers: DuplicateHeaders,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            default_bounds: DEFAULT_BOUNDS.to_string(),
            prune_sheet_columns: false,
            duplicate_headers: DuplicateHeaders::default(),
        }
    }
}

/// What the cache holds: the raw grid plus the range it was fetched with.
#[derive(Debug, Clone)]
pub struct CachedSheet {
    pub range: String,
    pub grid: Arc<Grid>,
}

/// Result of a Google Sheets read.
#[derive(Debug, Clone)]
pub struct ConvertedSheet {
    pub spreadsheet_id: String,
    /// The range actually fetched (auto-detected when none was given).
    pub range: String,
    /// True when the grid came from the cache.
    pub cached: bool,
    pub table: Normalized,
}

/// Result of an uploaded file conversion.
#[derive(Debug, Clone)]
pub struct FileConversion {
    pub table: Normalized,
}

/// Accepted upload formats, chosen by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Csv,
    Xlsx,
}

impl UploadKind {
    /// Match a filename suffix case-insensitively.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

/// Coordinates upstream fetches, caching and normalization.
///
/// Built once at startup and shared between requests.
pub struct SheetFetcher {
    source: Arc<dyn SheetSource>,
    cache: Arc<TtlCache<CachedSheet>>,
    settings: FetchSettings,
}

impl SheetFetcher {
    pub fn new(
        source: Arc<dyn SheetSource>,
        cache: Arc<TtlCache<CachedSheet>>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    /// The shared result cache.
    #[must_use]
    pub fn cache(&self) -> &TtlCache<CachedSheet> {
        &self.cache
    }

    /// Read an explicit range of a spreadsheet given by raw ID.
    ///
    /// # Errors
    ///
    /// `BadRequest` if either argument is blank, `ConversionFailed` if the
    /// upstream fetch fails.
    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        header_row: Option<usize>,
    ) -> GridResult<ConvertedSheet> {
        let spreadsheet_id = spreadsheet_id.trim();
        let range = range.trim();
        if spreadsheet_id.is_empty() || range.is_empty() {
            return Err(GridError::bad_request("Missing spreadsheet_id or range"));
        }

        self.load(spreadsheet_id, Some(range), header_row).await
    }

    /// Convert a sheet given by URL or ID, auto-detecting the range if needed.
    ///
    /// # Errors
    ///
    /// `BadRequest` if no identifier can be extracted or the spreadsheet has
    /// no worksheets; `ConversionFailed` for upstream failures.
    pub async fn convert_link(
        &self,
        sheet_ref: &str,
        range: Option<&str>,
        header_row: Option<usize>,
    ) -> GridResult<ConvertedSheet> {
        let spreadsheet_id = resolve_spreadsheet_id(sheet_ref)
            .ok_or_else(|| GridError::bad_request("Invalid Google Sheets URL or spreadsheet ID"))?;
        let range = range.map(str::trim).filter(|r| !r.is_empty());

        self.load(&spreadsheet_id, range, header_row).await
    }

    /// Convert an uploaded `.csv` or `.xlsx` file.
    ///
    /// Parsing is CPU-bound; async callers should run this on a blocking
    /// thread.
    ///
    /// # Errors
    ///
    /// `BadRequest` for unsupported filenames, `ConversionFailed` when the
    /// bytes cannot be parsed.
    pub fn convert_upload(&self, filename: &str, bytes: &[u8]) -> GridResult<FileConversion> {
        let kind = UploadKind::from_filename(filename)
            .ok_or_else(|| GridError::bad_request("Only .csv or .xlsx supported"))?;

        let grid = match kind {
            UploadKind::Csv => Grid::from_csv_bytes(bytes),
            UploadKind::Xlsx => Grid::from_xlsx_bytes(bytes),
        }
        .map_err(|e| {
            tracing::warn!(filename, error = %e, "failed to parse upload");
            GridError::from(e)
        })?;

        let options = NormalizeOptions::default()
            .with_column_pruning(true)
            .with_duplicate_headers(self.settings.duplicate_headers);
        let table = normalize(&grid.without_empty_rows(), &options);

        tracing::debug!(
            filename,
            rows = table.records.len(),
            columns = table.headers.len(),
            "converted upload"
        );
        Ok(FileConversion { table })
    }

    async fn load(
        &self,
        spreadsheet_id: &str,
        selector: Option<&str>,
        header_row: Option<usize>,
    ) -> GridResult<ConvertedSheet> {
        let key = cache_key(spreadsheet_id, selector);

        let (sheet, cached) = if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(cache_key = %key, "sheet cache hit");
            (hit, true)
        } else {
            tracing::debug!(cache_key = %key, "sheet cache miss");
            let sheet = self.fetch(spreadsheet_id, selector).await?;
            self.cache.put(key, sheet.clone());
            (sheet, false)
        };

        let options = NormalizeOptions::default()
            .with_header_row(header_row)
            .with_column_pruning(self.settings.prune_sheet_columns)
            .with_duplicate_headers(self.settings.duplicate_headers);
        let table = normalize(&sheet.grid, &options);

        Ok(ConvertedSheet {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: sheet.range,
            cached,
            table,
        })
    }

    async fn fetch(&self, spreadsheet_id: &str, selector: Option<&str>) -> GridResult<CachedSheet> {
        let range = match selector {
            Some(range) => range.to_string(),
            None => self.detect_range(spreadsheet_id).await?,
        };

        let grid = self
            .source
            .fetch_grid(spreadsheet_id, &range)
            .await
            .map_err(|e| {
                tracing::warn!(spreadsheet_id, range = %range, error = %e, "upstream fetch failed");
                GridError::from(e)
            })?;

        Ok(CachedSheet {
            range,
            grid: Arc::new(grid),
        })
    }

    async fn detect_range(&self, spreadsheet_id: &str) -> GridResult<String> {
        let names = self
            .source
            .list_sheet_names(spreadsheet_id)
            .await
            .map_err(|e| {
                tracing::warn!(spreadsheet_id, error = %e, "listing worksheets failed");
                GridError::from(e)
            })?;

        let first = names
            .first()
            .ok_or_else(|| GridError::bad_request("No sheets found in spreadsheet"))?;

        Ok(format!(
            "{}!{}",
            quote_sheet_name(first),
            self.settings.default_bounds
        ))
    }
}

/// `<id>:<selector>`; an absent selector leaves the part after `:` empty.
#[must_use]
pub fn cache_key(spreadsheet_id: &str, selector: Option<&str>) -> String {
    format!("{spreadsheet_id}:{}", selector.unwrap_or_default())
}

/// Quote a worksheet title for A1 notation when it needs it.
fn quote_sheet_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

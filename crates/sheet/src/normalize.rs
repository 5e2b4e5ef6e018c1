//! Grid-to-records normalization.
//!
//! Turns a raw grid of unknown shape into an ordered list of JSON-ready
//! records keyed by cleaned column headers:
//!
//! 1. pick the header row (explicit, detected, or synthesized labels)
//! 2. optionally drop columns that are blank in every data row
//! 3. clean header names (newlines to spaces, trimmed, unique)
//! 4. pad or cut each data row to the header width, trimming strings
//! 5. skip rows that are entirely blank
//!
//! Normalization never fails; malformed input degrades to fewer (or zero)
//! records.

use crate::cell::CellValue;
use crate::grid::Grid;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// One emitted row: header name to cell value, in header order.
pub type Record = IndexMap<String, CellValue>;

/// Which column wins when two headers clean to the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateHeaders {
    /// The later column's value is used; the key keeps the first position.
    #[default]
    LastWins,
    /// The earlier column's value is used and later duplicates are ignored.
    FirstWins,
}

/// Knobs for [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Explicit 1-based header row. `None` enables header detection.
    pub header_row: Option<usize>,
    /// Drop columns whose data cells are all blank.
    pub prune_empty_columns: bool,
    /// Collision policy for duplicate cleaned header names.
    pub duplicate_headers: DuplicateHeaders,
}

impl NormalizeOptions {
    /// Set the explicit 1-based header row
    #[must_use]
    pub fn with_header_row(mut self, header_row: Option<usize>) -> Self {
        self.header_row = header_row;
        self
    }

    /// Enable or disable empty-column pruning
    #[must_use]
    pub fn with_column_pruning(mut self, prune: bool) -> Self {
        self.prune_empty_columns = prune;
        self
    }

    /// Set the duplicate-header policy
    #[must_use]
    pub fn with_duplicate_headers(mut self, policy: DuplicateHeaders) -> Self {
        self.duplicate_headers = policy;
        self
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    /// Unique, cleaned column names in output order.
    pub headers: Vec<String>,
    /// Accepted data rows in original order.
    pub records: Vec<Record>,
}

impl Normalized {
    fn empty() -> Self {
        Self::default()
    }
}

/// Normalize a raw grid into header-keyed records.
///
/// ```
/// use gridjson_sheet::{normalize, Grid, NormalizeOptions};
///
/// let grid = Grid::from_data(vec![
///     vec!["Name", "Age"],
///     vec!["Alice", "30"],
///     vec!["", ""],
/// ]);
/// let out = normalize(&grid, &NormalizeOptions::default());
///
/// assert_eq!(out.headers, vec!["Name", "Age"]);
/// assert_eq!(out.records.len(), 1);
/// ```
#[must_use]
pub fn normalize(grid: &Grid, options: &NormalizeOptions) -> Normalized {
    if grid.row_count() < 2 {
        return Normalized::empty();
    }

    let (raw_headers, data_rows) = split_header(grid, options.header_row);

    let kept_columns: Vec<usize> = if options.prune_empty_columns {
        (0..raw_headers.len())
            .filter(|&col| {
                data_rows
                    .iter()
                    .any(|row| row.get(col).is_some_and(|cell| !cell.is_blank()))
            })
            .collect()
    } else {
        (0..raw_headers.len()).collect()
    };

    let cleaned = label_columns(&raw_headers, &kept_columns);

    let (headers, column_for_header) =
        resolve_duplicates(&cleaned, &kept_columns, options.duplicate_headers);

    let records = data_rows
        .iter()
        .filter_map(|row| build_record(row, &headers, &column_for_header))
        .collect();

    Normalized { headers, records }
}

/// Header candidates and the data rows beneath them.
fn split_header<'g>(
    grid: &'g Grid,
    header_row: Option<usize>,
) -> (Vec<String>, &'g [Vec<CellValue>]) {
    let data = grid.data();

    let header_index = match header_row {
        Some(n) => {
            let idx = n.saturating_sub(1);
            // Out of range leaves the grid as-is with the top row as header
            Some(if idx < data.len() { idx } else { 0 })
        }
        None => detect_header(grid).then_some(0),
    };

    match header_index {
        Some(idx) => {
            let names = data[idx].iter().map(CellValue::as_str).collect();
            (names, &data[idx + 1..])
        }
        None => {
            let names = (0..grid.width()).map(positional_label).collect();
            (names, data)
        }
    }
}

/// True when more than half of the top row's columns hold text.
fn detect_header(grid: &Grid) -> bool {
    let Some(first) = grid.row(0) else {
        return false;
    };
    let text_cells = first
        .iter()
        .filter(|cell| cell.is_string() && !cell.is_blank())
        .count();
    text_cells * 2 > grid.width()
}

/// Collapse line breaks to single spaces and trim.
#[must_use]
pub fn clean_header(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

fn positional_label(col: usize) -> String {
    format!("Column {}", col + 1)
}

/// Cleaned names for `columns`; blank names get a positional label that no
/// other header already uses (`Column 2`, then `Column 2 (2)`, ...).
fn label_columns(raw_headers: &[String], columns: &[usize]) -> Vec<String> {
    let mut names: Vec<Option<String>> = columns
        .iter()
        .map(|&col| Some(clean_header(&raw_headers[col])).filter(|name| !name.is_empty()))
        .collect();
    let mut taken: HashSet<String> = names.iter().flatten().cloned().collect();

    for (name, &col) in names.iter_mut().zip(columns) {
        if name.is_none() {
            let base = positional_label(col);
            let mut label = base.clone();
            let mut n = 2;
            while taken.contains(&label) {
                label = format!("{base} ({n})");
                n += 1;
            }
            taken.insert(label.clone());
            *name = Some(label);
        }
    }

    names.into_iter().flatten().collect()
}

/// Deduplicate cleaned names and map each surviving name to its source column.
fn resolve_duplicates(
    cleaned: &[String],
    columns: &[usize],
    policy: DuplicateHeaders,
) -> (Vec<String>, Vec<usize>) {
    let mut by_name: IndexMap<&str, usize> = IndexMap::with_capacity(cleaned.len());
    for (name, &col) in cleaned.iter().zip(columns) {
        match policy {
            DuplicateHeaders::LastWins => {
                by_name.insert(name.as_str(), col);
            }
            DuplicateHeaders::FirstWins => {
                by_name.entry(name.as_str()).or_insert(col);
            }
        }
    }

    by_name
        .into_iter()
        .map(|(name, col)| (name.to_string(), col))
        .unzip()
}

fn build_record(row: &[CellValue], headers: &[String], columns: &[usize]) -> Option<Record> {
    let record: Record = headers
        .iter()
        .zip(columns)
        .map(|(name, &col)| {
            let value = row.get(col).map_or_else(
                || CellValue::String(String::new()),
                CellValue::to_record_value,
            );
            (name.clone(), value)
        })
        .collect();

    let has_content = record.values().any(|value| !value.as_str().trim().is_empty());
    has_content.then_some(record)
}

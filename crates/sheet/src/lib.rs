//! Raw grids and their normalization into JSON records
//!
//! A [`Grid`] is the 2-D block of cells an upstream source hands back: a
//! Google Sheets range, an uploaded CSV, or the first worksheet of an XLSX
//! workbook. [`normalize`] turns it into header-keyed [`Record`]s.
//!
//! # Examples
//!
//! ```
//! use gridjson_sheet::{normalize, CellValue, Grid, NormalizeOptions};
//!
//! let grid = Grid::from_csv_bytes(b"Name,Age\nAlice,30\n,\n").unwrap();
//! let out = normalize(&grid, &NormalizeOptions::default());
//!
//! assert_eq!(out.headers, vec!["Name", "Age"]);
//! assert_eq!(out.records[0]["Age"], CellValue::Int(30));
//! ```

mod cell;
mod csv;
mod error;
mod grid;
mod normalize;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export grid type.
pub use grid::Grid;
/// Re-export the normalizer.
pub use normalize::{
    clean_header, normalize, DuplicateHeaders, NormalizeOptions, Normalized, Record,
};

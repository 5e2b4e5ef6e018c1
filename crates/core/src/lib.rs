//! # gridjson-core
//!
//! Request-side logic for gridjson.
//!
//! This crate provides:
//! - the request error taxonomy
//! - spreadsheet identifier extraction
//! - the shared TTL/LRU result cache
//! - the [`SheetSource`] seam for upstream spreadsheet services
//! - [`SheetFetcher`], which ties them to the grid normalizer

/// Result cache.
pub mod cache;
/// Error types and result aliases.
pub mod error;
/// Fetch orchestration.
pub mod fetch;
/// Identifier extraction.
pub mod identifier;
/// Upstream service trait.
pub mod source;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use error::{GridError, GridResult, SourceError};
pub use fetch::{
    CachedSheet, ConvertedSheet, FetchSettings, FileConversion, SheetFetcher, UploadKind,
};
pub use identifier::resolve_spreadsheet_id;
pub use source::SheetSource;

/// Re-export the sheet crate for downstream convenience.
pub use gridjson_sheet;

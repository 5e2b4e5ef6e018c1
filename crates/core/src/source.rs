//! Upstream spreadsheet service seam.

use crate::error::SourceError;
use async_trait::async_trait;
use gridjson_sheet::Grid;

/// A remote spreadsheet service that can hand back raw grids.
///
/// Implementations own their credentials and transport; callers only see
/// grids and sheet names.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetch the cells of `range` (e.g. `Sheet1!A1:D20`) from a spreadsheet.
    async fn fetch_grid(&self, spreadsheet_id: &str, range: &str) -> Result<Grid, SourceError>;

    /// Titles of the spreadsheet's worksheets, in upstream order.
    async fn list_sheet_names(&self, spreadsheet_id: &str) -> Result<Vec<String>, SourceError>;
}

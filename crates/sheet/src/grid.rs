use crate::cell::CellValue;

/// A raw, possibly ragged 2-D grid of cells (row-major).
///
/// Grids are treated as values: transformations return a new grid and leave
/// the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// Create an empty grid
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-converted rows
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Grid { rows }
    }

    /// Create a grid from a 2D vector of values
    ///
    /// ```
    /// use gridjson_sheet::Grid;
    ///
    /// let grid = Grid::from_data(vec![vec!["Name", "Age"], vec!["Alice", "30"]]);
    /// assert_eq!(grid.row_count(), 2);
    /// ```
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Grid { rows }
    }

    /// Build a grid from JSON rows such as the Sheets API `values` array
    #[must_use]
    pub fn from_json_rows(rows: &[Vec<serde_json::Value>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(CellValue::from_json).collect())
            .collect();
        Grid { rows }
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the grid has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get a cell; cells past the end of a short row read as `Null`
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        static NULL: CellValue = CellValue::Null;
        let r = self.rows.get(row)?;
        Some(r.get(col).unwrap_or(&NULL))
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// A copy of this grid without rows whose cells are all blank
    #[must_use]
    pub fn without_empty_rows(&self) -> Grid {
        let rows = self
            .rows
            .iter()
            .filter(|row| !row.iter().all(CellValue::is_blank))
            .cloned()
            .collect();
        Grid { rows }
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Grid::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_width_of_ragged_grid() {
        let grid = Grid::from_data(vec![vec!["a"], vec!["b", "c", "d"], vec![]]);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.width(), 3);
    }

    #[test]
    fn test_get_past_row_end_is_null() {
        let grid = Grid::from_data(vec![vec!["a"], vec!["b", "c"]]);
        assert_eq!(grid.get(0, 1), Some(&CellValue::Null));
        assert_eq!(grid.get(1, 1), Some(&CellValue::String("c".to_string())));
        assert_eq!(grid.get(5, 0), None);
    }

    #[test]
    fn test_without_empty_rows_leaves_original() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::from("x")],
            vec![CellValue::Null, CellValue::from("  ")],
            vec![],
            vec![CellValue::Int(0)],
        ]);
        let cleaned = grid.without_empty_rows();

        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(grid.row_count(), 4);
    }

    #[test]
    fn test_from_json_rows() {
        let rows = vec![vec![json!("Name"), json!("Age")], vec![json!("Bob"), json!(41)]];
        let grid = Grid::from_json_rows(&rows);
        assert_eq!(grid.get(1, 1), Some(&CellValue::Int(41)));
    }
}

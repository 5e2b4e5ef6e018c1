use crate::cell::CellValue;
use crate::error::Result;
use crate::grid::Grid;

impl Grid {
    /// Parse comma-separated bytes (an uploaded `.csv`) into a raw grid
    ///
    /// Every line becomes a row, including the first; header handling is
    /// left to the normalizer. Rows may differ in length and each field goes
    /// through [`CellValue::parse`] type inference.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::parse).collect());
        }

        Ok(Grid::from_rows(rows))
    }
}

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::grid::Grid;
use calamine::{open_workbook_from_rs, Data, ExcelDateTime, Reader, Xlsx, XlsxError};
use std::io::Cursor;

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Excel stores every number as a float; whole values read back as integers.
#[allow(clippy::float_cmp)]
fn number_cell(f: f64) -> CellValue {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// Date cells become ISO-8601 text; durations stay numeric (days).
fn datetime_cell(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return number_cell(dt.as_f64());
    }
    dt.as_datetime().map_or_else(
        || number_cell(dt.as_f64()),
        |datetime| CellValue::String(datetime.format(ISO_DATETIME).to_string()),
    )
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => number_cell(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn workbook_error(e: XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

impl Grid {
    /// Parse the first worksheet of an in-memory `.xlsx` file
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a readable workbook or the
    /// workbook has no worksheets.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<Cursor<&[u8]>> =
            open_workbook_from_rs(Cursor::new(bytes)).map_err(workbook_error)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SheetError::NoWorksheets)?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(workbook_error)?;

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        Ok(Grid::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime as WriterDateTime, Format, Workbook};

    fn workbook_bytes(build: impl FnOnce(&mut Workbook)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        build(&mut workbook);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_types() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "text").unwrap();
            ws.write_number(0, 1, 42).unwrap();
            ws.write_number(0, 2, 2.5).unwrap();
            ws.write_boolean(0, 3, true).unwrap();
        });

        let grid = Grid::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(grid.row_count(), 1);
        assert!(matches!(grid.get(0, 0), Some(CellValue::String(s)) if s == "text"));
        assert_eq!(grid.get(0, 1), Some(&CellValue::Int(42)));
        assert!(matches!(grid.get(0, 2), Some(CellValue::Float(f)) if (*f - 2.5).abs() < 0.01));
        assert_eq!(grid.get(0, 3), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_dates_read_as_iso_text() {
        let bytes = workbook_bytes(|wb| {
            let date_format = Format::new().set_num_format("yyyy-mm-dd");
            let time_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "When").unwrap();
            ws.write_string(0, 1, "Qty").unwrap();
            let day = WriterDateTime::from_ymd(2024, 1, 15).unwrap();
            ws.write_datetime_with_format(1, 0, &day, &date_format).unwrap();
            ws.write_number(1, 1, 3).unwrap();
            let stamp = WriterDateTime::from_ymd(2024, 3, 1)
                .unwrap()
                .and_hms(13, 45, 30)
                .unwrap();
            ws.write_datetime_with_format(2, 0, &stamp, &time_format).unwrap();
        });

        let grid = Grid::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(
            grid.get(1, 0),
            Some(&CellValue::String("2024-01-15T00:00:00".to_string()))
        );
        assert_eq!(grid.get(1, 1), Some(&CellValue::Int(3)));
        assert_eq!(
            grid.get(2, 0),
            Some(&CellValue::String("2024-03-01T13:45:30".to_string()))
        );
    }

    #[test]
    fn test_whole_numbers_become_ints() {
        assert_eq!(number_cell(709_000.0), CellValue::Int(709_000));
        assert_eq!(number_cell(-3.0), CellValue::Int(-3));
        assert_eq!(number_cell(9.99), CellValue::Float(9.99));
        assert_eq!(number_cell(1e300), CellValue::Float(1e300));
    }

    #[test]
    fn test_reads_first_sheet_only() {
        let bytes = workbook_bytes(|wb| {
            let first = wb.add_worksheet();
            first.set_name("Data").unwrap();
            first.write_string(0, 0, "Name").unwrap();
            first.write_string(1, 0, "Alice").unwrap();
            let second = wb.add_worksheet();
            second.set_name("Other").unwrap();
            second.write_string(0, 0, "ignored").unwrap();
        });

        let grid = Grid::from_xlsx_bytes(&bytes).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.get(1, 0), Some(&CellValue::String("Alice".to_string())));
    }

    #[test]
    fn test_gaps_read_as_null() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "a").unwrap();
            ws.write_string(0, 2, "c").unwrap();
            ws.write_string(2, 0, "x").unwrap();
        });

        let grid = Grid::from_xlsx_bytes(&bytes).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.get(0, 1), Some(&CellValue::Null));
        assert!(grid.row(1).unwrap().iter().all(CellValue::is_null));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = Grid::from_xlsx_bytes(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, SheetError::Workbook(_)));
    }
}

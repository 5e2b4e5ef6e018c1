use gridjson_sheet::{normalize, CellValue, Grid, NormalizeOptions};
use rust_xlsxwriter::Workbook;
use serde_json::json;

fn upload_options() -> NormalizeOptions {
    NormalizeOptions::default().with_column_pruning(true)
}

#[test]
fn test_csv_with_header_line() {
    let csv = b"Name,Age,City\nAlice,30,NYC\nBob,25,\n";
    let grid = Grid::from_csv_bytes(csv).unwrap();
    let out = normalize(&grid.without_empty_rows(), &upload_options());

    assert_eq!(out.headers, vec!["Name", "Age", "City"]);
    assert_eq!(
        serde_json::to_value(&out.records).unwrap(),
        json!([
            {"Name": "Alice", "Age": 30, "City": "NYC"},
            {"Name": "Bob", "Age": 25, "City": ""}
        ])
    );
}

#[test]
fn test_csv_blank_lines_and_empty_column() {
    let csv = b"id,unused,label\n,,\n1,,one\n\n2,,two\n";
    let grid = Grid::from_csv_bytes(csv).unwrap();
    let out = normalize(&grid.without_empty_rows(), &upload_options());

    assert_eq!(out.headers, vec!["id", "label"]);
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[1]["label"], CellValue::String("two".to_string()));
}

#[test]
fn test_csv_of_numbers_only() {
    let csv = b"1,2\n3,4\n";
    let grid = Grid::from_csv_bytes(csv).unwrap();
    let out = normalize(&grid, &upload_options());

    assert_eq!(out.headers, vec!["Column 1", "Column 2"]);
    assert_eq!(out.records.len(), 2);
}

#[test]
fn test_xlsx_with_multiline_header() {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "Product\nName").unwrap();
    ws.write_string(0, 1, "Price").unwrap();
    ws.write_string(1, 0, "Widget").unwrap();
    ws.write_number(1, 1, 9.99).unwrap();
    ws.write_string(2, 0, " Gadget ").unwrap();
    ws.write_number(2, 1, 20).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let grid = Grid::from_xlsx_bytes(&bytes).unwrap();
    let out = normalize(&grid.without_empty_rows(), &upload_options());

    assert_eq!(out.headers, vec!["Product Name", "Price"]);
    assert_eq!(out.records[1]["Product Name"], CellValue::String("Gadget".to_string()));
    assert_eq!(out.records[0]["Price"], CellValue::Float(9.99));
}

#[test]
fn test_sheets_values_payload() {
    let payload = json!([
        ["Name", "Age"],
        ["Alice", "30"],
        [],
        ["Carol"]
    ]);
    let rows: Vec<Vec<serde_json::Value>> = serde_json::from_value(payload).unwrap();
    let grid = Grid::from_json_rows(&rows);
    let out = normalize(&grid, &NormalizeOptions::default());

    assert_eq!(
        serde_json::to_value(&out.records).unwrap(),
        json!([
            {"Name": "Alice", "Age": "30"},
            {"Name": "Carol", "Age": ""}
        ])
    );
}

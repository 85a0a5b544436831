//! Spreadsheet to CSV conversion for prediction input.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::IngestError;

/// Convert the first worksheet of an XLS/XLSX workbook into CSV text.
pub fn first_sheet_to_csv(bytes: &[u8]) -> Result<String, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(range_to_csv(&range))
}

fn range_to_csv(range: &Range<Data>) -> String {
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(csv_cell)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one cell, quoting values that would break the delimited layout.
fn csv_cell(cell: &Data) -> String {
    let value = match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    };
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

// Excel export (xlsx only)
//
// Single-sheet snapshot of a reconciled result set, built in memory so the
// caller decides where the bytes go.

use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use scholar_recon::Record;

use crate::error::IoError;
use crate::export::{export_row, ExportCell, EXPORT_COLUMNS};

/// Excel's per-cell text limit.
const MAX_CELL_CHARS: usize = 32_767;

/// Column widths in Excel character units, aligned with `EXPORT_COLUMNS`.
const COLUMN_WIDTHS: [f64; 9] = [12.0, 60.0, 80.0, 40.0, 8.0, 45.0, 14.0, 45.0, 45.0];

/// Export records to an XLSX workbook in memory.
///
/// Row 0 is a bold, frozen header with an autofilter; one row per record
/// follows in input order.
pub fn export_to_buffer(records: &[Record], sheet_name: &str) -> Result<Vec<u8>, IoError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| IoError::Export(format!("Failed to create sheet '{}': {}", sheet_name, e)))?;

    write_header(worksheet)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in export_row(record).iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell)?;
        }
    }

    if !records.is_empty() {
        worksheet
            .autofilter(0, 0, records.len() as u32, (EXPORT_COLUMNS.len() - 1) as u16)
            .map_err(|e| IoError::Export(format!("Failed to set autofilter: {}", e)))?;
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| IoError::Export(format!("Failed to build XLSX: {}", e)))?;
    debug!("xlsx: {} rows, {} bytes", records.len(), bytes.len());
    Ok(bytes)
}

fn write_header(worksheet: &mut Worksheet) -> Result<(), IoError> {
    let bold = Format::new().set_bold();
    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *name, &bold)
            .map_err(|e| IoError::Export(format!("Failed to write header: {}", e)))?;
        worksheet
            .set_column_width(col, COLUMN_WIDTHS[col as usize])
            .map_err(|e| IoError::Export(format!("Failed to set column {} width: {}", col, e)))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| IoError::Export(format!("Failed to set freeze panes: {}", e)))?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &ExportCell) -> Result<(), IoError> {
    let written = match cell {
        ExportCell::Empty => return Ok(()),
        ExportCell::Text(s) => worksheet.write_string(row, col, truncate_cell(s)),
        ExportCell::Number(n) => worksheet.write_number(row, col, *n),
    };
    written
        .map(|_| ())
        .map_err(|e| IoError::Export(format!("Failed to write cell ({row}, {col}): {}", e)))
}

fn truncate_cell(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

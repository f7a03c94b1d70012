//! Excel workbook output.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::fields::{Record, COLUMNS};

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "COSHH";

/// Widest a column is allowed to grow, in characters.
const MAX_COLUMN_WIDTH: usize = 80;

/// Write records to an `.xlsx` workbook: bold header row, one row per record,
/// no index column.
pub fn write_xlsx(records: &[Record], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.values().iter().enumerate() {
            worksheet.write_string(row, col as u16, *value)?;
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width.min(MAX_COLUMN_WIDTH) as f64 + 2.0)?;
    }

    workbook.save(path)?;
    Ok(())
}

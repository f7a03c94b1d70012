//! CSV output.

use std::path::Path;

use crate::error::Result;
use crate::fields::{Record, COLUMNS};

/// Write records as CSV with a header row.
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;
    Ok(())
}

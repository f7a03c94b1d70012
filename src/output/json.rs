//! JSON rendering of records.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::fields::Record;

/// Serialise records as a pretty-printed JSON array.
pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records as JSON to `path`.
pub fn write_json(records: &[Record], path: &Path) -> Result<()> {
    fs::write(path, to_json(records)?)?;
    Ok(())
}

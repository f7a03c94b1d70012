//! Hazard field extraction from raw safety-data-sheet text.

mod record;
mod rules;

pub use record::{Record, ADDITIONAL_RECOMMENDATIONS, COLUMNS, UNKNOWN_NAME};
pub use rules::{extract_fields, FieldExtractor};

//! The fixed-shape row produced for each safety data sheet.

use serde::Serialize;

/// Column names in output order.
pub const COLUMNS: [&str; 7] = [
    "Chemical Name",
    "Hazard Classification",
    "Exposure Risks",
    "Control Measures",
    "Emergency Procedures",
    "Additional Recommendations",
    "Source File",
];

/// Value of the "Additional Recommendations" column for every record.
pub const ADDITIONAL_RECOMMENDATIONS: &str =
    "Store tightly sealed; Avoid environmental release; Train staff";

/// Chemical name used when the sheet has no "Product name" line.
pub const UNKNOWN_NAME: &str = "N/A";

/// One extracted safety data sheet.
///
/// Field order matches [`COLUMNS`]; serialising with serde yields the
/// column names as keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Chemical Name")]
    pub chemical_name: String,

    #[serde(rename = "Hazard Classification")]
    pub hazard_classification: String,

    #[serde(rename = "Exposure Risks")]
    pub exposure_risks: String,

    #[serde(rename = "Control Measures")]
    pub control_measures: String,

    #[serde(rename = "Emergency Procedures")]
    pub emergency_procedures: String,

    #[serde(rename = "Additional Recommendations")]
    pub additional_recommendations: String,

    #[serde(rename = "Source File")]
    pub source_file: String,
}

impl Record {
    /// Attach the name of the file this record came from.
    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = name.into();
        self
    }

    /// Cell values in [`COLUMNS`] order.
    pub fn values(&self) -> [&str; 7] {
        [
            &self.chemical_name,
            &self.hazard_classification,
            &self.exposure_risks,
            &self.control_measures,
            &self.emergency_procedures,
            &self.additional_recommendations,
            &self.source_file,
        ]
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values()[i])
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            chemical_name: UNKNOWN_NAME.to_string(),
            hazard_classification: String::new(),
            exposure_risks: String::new(),
            control_measures: String::new(),
            emergency_procedures: String::new(),
            additional_recommendations: ADDITIONAL_RECOMMENDATIONS.to_string(),
            source_file: String::new(),
        }
    }
}

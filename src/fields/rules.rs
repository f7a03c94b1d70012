//! Keyword and pattern heuristics that fill a [`Record`].
//!
//! All matching is case-insensitive plain containment: there is no stemming
//! and no negation handling, so "no ventilation required" still yields
//! "Local exhaust ventilation".

use std::collections::HashSet;

use regex::Regex;

use super::record::{Record, ADDITIONAL_RECOMMENDATIONS, UNKNOWN_NAME};

/// A label emitted when any of its keywords occurs in the text.
struct KeywordRule {
    keywords: &'static [&'static str],
    label: &'static str,
}

const fn rule(keywords: &'static [&'static str], label: &'static str) -> KeywordRule {
    KeywordRule { keywords, label }
}

const EXPOSURE_RULES: &[KeywordRule] = &[
    rule(&["inhalation"], "Inhalation"),
    rule(&["skin"], "Skin contact"),
    rule(&["eye"], "Eye contact"),
];

const CONTROL_RULES: &[KeywordRule] = &[
    rule(&["ventilation"], "Local exhaust ventilation"),
    rule(&["goggles", "face shield"], "Eye/face protection"),
    rule(&["gloves"], "Protective gloves (EN 374)"),
    rule(&["respiratory"], "Respiratory protection"),
];

const EMERGENCY_RULES: &[KeywordRule] = &[
    rule(&["fresh air"], "Move to fresh air"),
    rule(&["rinse"], "Rinse eyes/skin"),
    rule(&["vomiting"], "Do not induce vomiting"),
    rule(&["fire"], "Use CO₂, foam, dry powder"),
];

/// Compiled field extractor. Build once and reuse across documents.
pub struct FieldExtractor {
    product_name: Regex,
    hazard_statement: Regex,
}

impl FieldExtractor {
    /// Compile the extraction patterns.
    pub fn new() -> Self {
        Self {
            // "Product name" then spaces or a colon, captured to end of the same line
            product_name: Regex::new(r"(?im)product name(?:[ \t]*:[ \t]*|[ \t]+)(.*)$").unwrap(),
            // H-code and its statement, up to the next period on the same line
            hazard_statement: Regex::new(r"(?i)(H\d{3}.*?)\.").unwrap(),
        }
    }

    /// Build a record from raw (possibly OCR'd) text. Source File is left empty.
    pub fn extract(&self, text: &str) -> Record {
        let lower = text.to_lowercase();

        Record {
            chemical_name: self.chemical_name(text),
            hazard_classification: self.hazard_classification(text),
            exposure_risks: apply_rules(&lower, EXPOSURE_RULES),
            control_measures: apply_rules(&lower, CONTROL_RULES),
            emergency_procedures: apply_rules(&lower, EMERGENCY_RULES),
            additional_recommendations: ADDITIONAL_RECOMMENDATIONS.to_string(),
            source_file: String::new(),
        }
    }

    fn chemical_name(&self, text: &str) -> String {
        // A label with nothing after it on its line is not a name.
        self.product_name
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    /// Distinct hazard statements, in order of first appearance.
    fn hazard_classification(&self, text: &str) -> String {
        let mut seen = HashSet::new();
        let statements: Vec<&str> = self
            .hazard_statement
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|s| seen.insert(*s))
            .collect();
        statements.join("; ")
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_rules(lower: &str, rules: &[KeywordRule]) -> String {
    rules
        .iter()
        .filter(|r| r.keywords.iter().any(|k| lower.contains(k)))
        .map(|r| r.label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extract a record from text with a freshly compiled [`FieldExtractor`].
pub fn extract_fields(text: &str) -> Record {
    FieldExtractor::new().extract(text)
}

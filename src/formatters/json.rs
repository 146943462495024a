use crate::advisor::Recommendation;
use serde_json;

/// JSON formatter for recommendations
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format recommendation as pretty-printed JSON
    pub fn format(recommendation: &Recommendation) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(recommendation)
    }

    /// Format recommendation as compact JSON (no whitespace)
    pub fn format_compact(recommendation: &Recommendation) -> Result<String, serde_json::Error> {
        serde_json::to_string(recommendation)
    }
}

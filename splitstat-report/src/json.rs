//! JSON Report Generation

use crate::report::AnalysisReport;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Serialize the report as pretty-printed JSON.
pub fn generate_json_report(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

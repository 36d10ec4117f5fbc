#![warn(missing_docs)]
//! Splitstat Report - Summaries and Output
//!
//! Aggregates per-cell test results into experiment-level verdicts and
//! renders them:
//! - Human-readable console summary
//! - JSON (machine-readable)

mod human;
mod json;
mod report;
mod verdict;

pub use human::render_human;
pub use json::{SCHEMA_VERSION, generate_json_report};
pub use report::{
    AnalysisReport, CellFailure, CellReport, ExperimentReport, ExperimentVerdict, ReportMeta,
};
pub use verdict::summarize_experiment;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#![warn(missing_docs)]
//! Splitstat Data Preparation
//!
//! Turns raw event logs into the clean sample pairs the test procedures
//! consume:
//! - Discovers and reads dated `users` / `messages` / `payments` CSV drops
//! - Normalizes the nested per-user experiment-flag JSON
//! - Deduplicates users and payment bursts, merges the three logs
//! - Resolves arm assignments, excluding users who switched groups
//! - Aggregates per user into one value per (experiment, metric) arm

mod ingest;
mod merge;
mod prep;
mod schema;

pub use ingest::{DatasetFile, DatasetKind, IngestError, discover_datasets, load_frame};
pub use prep::{PrepError, PreparedRow, ab_samples, prepare_for_experiment};
pub use schema::{Assignment, EventFrame, EventRow};

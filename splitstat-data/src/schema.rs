//! Event Frame Schema
//!
//! In-memory row model for the merged event logs. One [`EventRow`] is one
//! (user, day, message-batch, payment) combination after the left-joins;
//! experiment flags travel with each row because a user's flags are
//! observed per day.

use chrono::NaiveDate;
use fxhash::FxHashMap;

/// Per-user experiment arm label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignment {
    /// Not enrolled in the experiment (missing or unparseable flag)
    Excluded,
    /// Control arm (flag false)
    Control,
    /// Treatment arm (flag true)
    Treatment,
}

impl Assignment {
    /// Map a raw flag value to an arm label
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => Assignment::Excluded,
            Some(false) => Assignment::Control,
            Some(true) => Assignment::Treatment,
        }
    }
}

/// One merged event row
#[derive(Debug, Clone)]
pub struct EventRow {
    /// User identifier
    pub user_id: String,
    /// Observation day (from the dataset file date)
    pub date: NaiveDate,
    /// Experiment flags observed for this user on this day
    pub flags: FxHashMap<String, Option<bool>>,
    /// Messages sent, 0 when no message log matched
    pub messages_count: f64,
    /// Payment amount in USD, 0 when no payment matched
    pub price_usd: f64,
}

/// The merged dataset: all rows plus the experiment names seen in the logs
#[derive(Debug, Clone, Default)]
pub struct EventFrame {
    /// Merged rows
    pub rows: Vec<EventRow>,
    /// Experiment flag names discovered in the users logs, sorted
    pub experiments: Vec<String>,
}

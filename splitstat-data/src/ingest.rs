//! Dataset Ingestion
//!
//! Reads the dated CSV drops (`users_all_<date>.csv` and friends), parses
//! the nested experiment-flag JSON, and applies the per-source cleanups:
//! latest-row user dedup, payment dedup and burst filtering.

use crate::merge::merge_events;
use crate::schema::EventFrame;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use fxhash::FxHashMap;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The three event logs an analysis needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatasetKind {
    /// Per-user daily snapshots with experiment flags
    Users,
    /// Message counts
    Messages,
    /// Payment events
    Payments,
}

impl DatasetKind {
    /// File-name prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Users => "users",
            DatasetKind::Messages => "messages",
            DatasetKind::Payments => "payments",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered dataset file
#[derive(Debug, Clone)]
pub struct DatasetFile {
    /// Which log this file belongs to
    pub kind: DatasetKind,
    /// Date encoded in the file name
    pub date: NaiveDate,
    /// Full path
    pub path: PathBuf,
}

/// Errors from ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    /// Directory or file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// CSV parsing failed
    #[error("failed to parse {path:?}: {source}")]
    Csv {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },

    /// A required log has no files in the data directory
    #[error("no {kind} dataset files found")]
    MissingDataset {
        /// The absent log
        kind: DatasetKind,
    },

    /// The experiment-flag blob did not normalize into JSON
    #[error("malformed experiment flags {raw:?}: {source}")]
    FlagJson {
        /// The raw cell content
        raw: String,
        /// Underlying error
        source: serde_json::Error,
    },

    /// A timestamp cell matched none of the accepted formats
    #[error("unparseable timestamp {0:?}")]
    Timestamp(String),
}

/// Discover dataset files named `{users,messages,payments}_all_<date>.csv`,
/// ordered by kind and date. All three kinds must be present.
pub fn discover_datasets(dir: &Path) -> Result<Vec<DatasetFile>, IngestError> {
    let name_re = Regex::new(r"^(users|messages|payments)_all_(\d{4}-\d{2}-\d{2})\.csv$")
        .expect("dataset file pattern");

    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(captures) = name_re.captures(name) else {
            continue;
        };

        let kind = match &captures[1] {
            "users" => DatasetKind::Users,
            "messages" => DatasetKind::Messages,
            _ => DatasetKind::Payments,
        };
        let Ok(date) = NaiveDate::parse_from_str(&captures[2], "%Y-%m-%d") else {
            continue;
        };

        files.push(DatasetFile { kind, date, path });
    }

    files.sort_by(|a, b| (a.kind, a.date).cmp(&(b.kind, b.date)));

    for kind in [DatasetKind::Users, DatasetKind::Messages, DatasetKind::Payments] {
        if !files.iter().any(|f| f.kind == kind) {
            return Err(IngestError::MissingDataset { kind });
        }
    }

    Ok(files)
}

/// Load, clean, and merge all dataset files under `dir` into one frame.
pub fn load_frame(dir: &Path) -> Result<EventFrame, IngestError> {
    let files = discover_datasets(dir)?;

    let mut experiments = BTreeSet::new();
    let mut users = Vec::new();
    let mut messages = Vec::new();
    let mut payments = Vec::new();

    for file in &files {
        match file.kind {
            DatasetKind::Users => read_users_file(file, &mut experiments, &mut users)?,
            DatasetKind::Messages => read_messages_file(file, &mut messages)?,
            DatasetKind::Payments => read_payments_file(file, &mut payments)?,
        }
    }

    let payments = clean_payments(payments);

    Ok(merge_events(
        users,
        messages,
        payments,
        experiments.into_iter().collect(),
    ))
}

/// One user-day snapshot after flag normalization
#[derive(Debug, Clone)]
pub(crate) struct UserDay {
    pub user_id: String,
    pub ts: NaiveDateTime,
    pub date: NaiveDate,
    pub flags: FxHashMap<String, Option<bool>>,
}

#[derive(Debug, Clone)]
pub(crate) struct MessageEvent {
    pub user_id: String,
    pub date: NaiveDate,
    pub messages_count: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct PaymentEvent {
    pub insert_id: String,
    pub user_id: String,
    pub ts: NaiveDateTime,
    pub date: NaiveDate,
    pub price_usd: f64,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    user_id: String,
    ts: String,
    ampl_user_data: String,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    user_id: String,
    messages_count: f64,
}

#[derive(Debug, Deserialize)]
struct PaymentRecord {
    insert_id: String,
    user_id: String,
    ts: String,
    price_usd: f64,
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, IngestError> {
    csv::Reader::from_path(path).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, IngestError> {
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    Err(IngestError::Timestamp(raw.to_string()))
}

/// Normalize the `ampl_user_data` cell: single-quoted JSON of `$`-prefixed
/// keys with 0/1-ish values. Unparseable values become `None` rather than
/// failing the row.
pub(crate) fn parse_flag_blob(
    raw: &str,
) -> Result<FxHashMap<String, Option<bool>>, IngestError> {
    let normalized = raw.replace('\'', "\"");
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&normalized)
        .map_err(|source| IngestError::FlagJson {
            raw: raw.to_string(),
            source,
        })?;

    let mut flags = FxHashMap::default();
    for (key, value) in map {
        flags.insert(key.trim_matches('$').to_string(), flag_value(&value));
    }
    Ok(flags)
}

fn flag_value(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_i64().map(|i| i != 0),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i != 0),
        _ => None,
    }
}

/// Read one users file: keep only experiment flags (`exp*` keys), drop rows
/// carrying no flag at all, and keep each user's latest row by timestamp.
fn read_users_file(
    file: &DatasetFile,
    experiments: &mut BTreeSet<String>,
    out: &mut Vec<UserDay>,
) -> Result<(), IngestError> {
    let mut reader = csv_reader(&file.path)?;

    let mut day_rows: Vec<UserDay> = Vec::new();
    for record in reader.deserialize::<UserRecord>() {
        let record = record.map_err(|source| IngestError::Csv {
            path: file.path.clone(),
            source,
        })?;

        let all_flags = parse_flag_blob(&record.ampl_user_data)?;
        let flags: FxHashMap<String, Option<bool>> = all_flags
            .into_iter()
            .filter(|(key, _)| key.starts_with("exp"))
            .collect();

        if !flags.values().any(|v| v.is_some()) {
            continue;
        }

        experiments.extend(flags.keys().cloned());

        day_rows.push(UserDay {
            user_id: record.user_id,
            ts: parse_timestamp(&record.ts)?,
            date: file.date,
            flags,
        });
    }

    // Latest snapshot wins within a day's file.
    day_rows.sort_by(|a, b| (&a.user_id, a.ts).cmp(&(&b.user_id, b.ts)));
    let mut deduped: Vec<UserDay> = Vec::with_capacity(day_rows.len());
    for row in day_rows {
        match deduped.last_mut() {
            Some(last) if last.user_id == row.user_id => *last = row,
            _ => deduped.push(row),
        }
    }

    out.extend(deduped);
    Ok(())
}

fn read_messages_file(
    file: &DatasetFile,
    out: &mut Vec<MessageEvent>,
) -> Result<(), IngestError> {
    let mut reader = csv_reader(&file.path)?;

    for record in reader.deserialize::<MessageRecord>() {
        let record = record.map_err(|source| IngestError::Csv {
            path: file.path.clone(),
            source,
        })?;
        out.push(MessageEvent {
            user_id: record.user_id,
            date: file.date,
            messages_count: record.messages_count,
        });
    }
    Ok(())
}

fn read_payments_file(
    file: &DatasetFile,
    out: &mut Vec<PaymentEvent>,
) -> Result<(), IngestError> {
    let mut reader = csv_reader(&file.path)?;

    for record in reader.deserialize::<PaymentRecord>() {
        let record = record.map_err(|source| IngestError::Csv {
            path: file.path.clone(),
            source,
        })?;
        out.push(PaymentEvent {
            insert_id: record.insert_id,
            user_id: record.user_id,
            ts: parse_timestamp(&record.ts)?,
            date: file.date,
            price_usd: record.price_usd,
        });
    }
    Ok(())
}

/// Deduplicate payments on `insert_id` (first occurrence wins) and drop
/// retry bursts: any payment arriving within 300 ms of the previous one in
/// global timestamp order.
pub(crate) fn clean_payments(mut payments: Vec<PaymentEvent>) -> Vec<PaymentEvent> {
    payments.sort_by(|a, b| (a.ts, &a.insert_id).cmp(&(b.ts, &b.insert_id)));

    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<PaymentEvent> = payments
        .into_iter()
        .filter(|p| seen.insert(p.insert_id.clone()))
        .collect();

    let burst_window = Duration::milliseconds(300);
    let mut previous_ts: Option<NaiveDateTime> = None;
    let mut kept = Vec::with_capacity(deduped.len());
    for payment in deduped {
        let keep = match previous_ts {
            None => true,
            Some(prev) => payment.ts - prev >= burst_window,
        };
        previous_ts = Some(payment.ts);
        if keep {
            kept.push(payment);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_parse_flag_blob() {
        let flags =
            parse_flag_blob("{'$exp_fancy_button': '1', '$exp_dark_mode': '0', '$tier': 'gold'}")
                .unwrap();
        assert_eq!(flags.get("exp_fancy_button"), Some(&Some(true)));
        assert_eq!(flags.get("exp_dark_mode"), Some(&Some(false)));
        // Non-numeric values degrade to None instead of failing the row.
        assert_eq!(flags.get("tier"), Some(&None));
    }

    #[test]
    fn test_parse_flag_blob_bad_json() {
        assert!(parse_flag_blob("not json at all").is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2024-03-01 10:30:00").is_ok());
        assert!(parse_timestamp("2024-03-01T10:30:00.250").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_discover_requires_all_kinds() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "users_all_2024-03-01.csv", "user_id,ts,ampl_user_data\n");
        write_file(dir.path(), "messages_all_2024-03-01.csv", "user_id,messages_count\n");

        let err = discover_datasets(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingDataset {
                kind: DatasetKind::Payments
            }
        ));
    }

    #[test]
    fn test_discover_sorts_by_date() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "users_all_2024-03-02.csv",
            "users_all_2024-03-01.csv",
            "messages_all_2024-03-01.csv",
            "payments_all_2024-03-01.csv",
            "notes.txt",
            "users_summary.csv",
        ] {
            write_file(dir.path(), name, "x\n");
        }

        let files = discover_datasets(dir.path()).unwrap();
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].kind, DatasetKind::Users);
        assert_eq!(files[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(files[1].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_payment_burst_filter() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let ts = |ms: i64| {
            date.and_hms_opt(12, 0, 0).unwrap() + Duration::milliseconds(ms)
        };
        let payment = |id: &str, at: i64| PaymentEvent {
            insert_id: id.to_string(),
            user_id: "u1".to_string(),
            ts: ts(at),
            date,
            price_usd: 1.0,
        };

        let kept = clean_payments(vec![
            payment("a", 0),
            payment("b", 100),  // burst: dropped
            payment("c", 450),  // 350ms after b: kept
            payment("c", 9000), // duplicate insert_id: dropped
            payment("d", 9000),
        ]);

        let ids: Vec<&str> = kept.iter().map(|p| p.insert_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_load_frame_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "users_all_2024-03-01.csv",
            "user_id,ts,ampl_user_data\n\
             u1,2024-03-01 08:00:00,\"{'$exp_btn': '1'}\"\n\
             u1,2024-03-01 09:00:00,\"{'$exp_btn': '1'}\"\n\
             u2,2024-03-01 08:30:00,\"{'$exp_btn': '0'}\"\n\
             u3,2024-03-01 08:45:00,\"{'$other': 'x'}\"\n",
        );
        write_file(
            dir.path(),
            "messages_all_2024-03-01.csv",
            "user_id,messages_count\nu1,4\n",
        );
        write_file(
            dir.path(),
            "payments_all_2024-03-01.csv",
            "insert_id,user_id,ts,price_usd\np1,u2,2024-03-01 10:00:00,9.99\n",
        );

        let frame = load_frame(dir.path()).unwrap();

        assert_eq!(frame.experiments, vec!["exp_btn".to_string()]);
        // u3 had no experiment flag and is dropped; u1's two snapshots
        // collapse to one row.
        assert_eq!(frame.rows.len(), 2);

        let u1 = frame.rows.iter().find(|r| r.user_id == "u1").unwrap();
        assert_eq!(u1.messages_count, 4.0);
        assert_eq!(u1.price_usd, 0.0);

        let u2 = frame.rows.iter().find(|r| r.user_id == "u2").unwrap();
        assert_eq!(u2.price_usd, 9.99);
        assert_eq!(u2.flags.get("exp_btn"), Some(&Some(false)));
    }
}

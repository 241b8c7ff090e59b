//! Recency selection for daily visit-log files
//!
//! Each service keeps one visit-log file per day under
//! `<service>/log/visit/`, named by date (`YYYY-MM-DD.<ext>`). A scan only
//! reads files younger than the trailing window, compared fractionally
//! against the current instant rather than by calendar day.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use super::{ScanError, ScanResult};

/// Trailing window of eligible log files. A file aged exactly this many
/// days is already out.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

const RECENCY_WINDOW_MS: i64 = RECENCY_WINDOW_DAYS * 24 * 60 * 60 * 1000;

/// Create `log/`, `log/visit/` and `log/error/` under a service root.
/// Idempotent; only permission-style failures surface as errors.
pub fn ensure_log_dirs(service_root: &Path) -> ScanResult<()> {
    for sub in ["log", "log/visit", "log/error"] {
        let dir = service_root.join(sub);
        fs::create_dir_all(&dir).map_err(|source| ScanError::Bootstrap {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// List the visit-log files whose name-derived date falls inside the
/// recency window. Files with undated names are excluded with a warning
/// rather than failing the scan.
pub fn eligible_files(visit_dir: &Path, now: DateTime<Utc>) -> ScanResult<Vec<PathBuf>> {
    let entries = fs::read_dir(visit_dir).map_err(|source| ScanError::Io {
        path: visit_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Io {
            path: visit_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        match file_date(&name) {
            Some(date) if within_window(date, now) => files.push(path),
            Some(_) => {}
            None => warn!(file = %name, "skipping visit log with undated name"),
        }
    }

    files.sort();
    Ok(files)
}

/// Date encoded in a log filename: everything before the first `.`,
/// parsed as `YYYY-MM-DD` and pinned to midnight UTC.
fn file_date(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.split('.').next().unwrap_or(name);
    let date = NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

fn within_window(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(date).num_milliseconds() < RECENCY_WINDOW_MS
}

//! Visit-log parsing
//!
//! A visit log is newline-delimited JSON, one entry per non-empty line.
//! Parsing is fail-fast: one malformed line fails the whole scan with the
//! offending path and line number, and the request gets no partial result.

use std::path::Path;

use crate::models::entry::LogLine;

use super::{ScanError, ScanResult};

/// Parse a whole file's text into log entries, skipping empty lines.
pub fn parse_log_text(path: &Path, text: &str) -> ScanResult<Vec<LogLine>> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line).map_err(|source| ScanError::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

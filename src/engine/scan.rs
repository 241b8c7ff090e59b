//! Scan orchestration — runs the whole pipeline for one request
//!
//! A scanner owns the services root and a shared handle to the bot
//! registry. Each call rescans the eligible files end to end and returns a
//! complete result; files are read whole, so memory is bounded by one
//! recency window of logs per service.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::query::{AggregationResult, QueryPredicate, ServiceSummary};

use super::aggregate::{Aggregator, ValueTally};
use super::bots::BotRegistry;
use super::facets::{FacetView, MISSING_VALUE};
use super::{filter, reader, recency, ScanError, ScanResult};

pub struct VisitScanner {
    root: PathBuf,
    bots: Arc<BotRegistry>,
}

impl VisitScanner {
    pub fn new(root: PathBuf, bots: Arc<BotRegistry>) -> Self {
        Self { root, bots }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Service directories under the root, sorted by name.
    pub fn services(&self) -> ScanResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| ScanError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut services = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ScanError::Io {
                path: self.root.clone(),
                source,
            })?;
            if entry.path().is_dir() {
                services.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        services.sort();
        Ok(services)
    }

    /// Full pipeline over every service, merged into one result.
    pub fn scan_all(
        &self,
        predicates: &[QueryPredicate],
        now: DateTime<Utc>,
    ) -> ScanResult<AggregationResult> {
        let mut aggregator = Aggregator::new();
        for service in self.services()? {
            self.scan_service_into(&service, predicates, now, &mut aggregator)?;
        }
        Ok(aggregator.finish())
    }

    /// Full pipeline over one service's eligible logs, tallying into the
    /// caller's aggregator.
    pub fn scan_service_into(
        &self,
        service: &str,
        predicates: &[QueryPredicate],
        now: DateTime<Utc>,
        aggregator: &mut Aggregator,
    ) -> ScanResult<()> {
        for path in self.service_files(service, now)? {
            let text = read_whole_file(&path)?;
            for entry in reader::parse_log_text(&path, &text)? {
                let facets = FacetView::from_entry(&entry);
                if self.bots.classify(&facets) {
                    continue;
                }
                if !filter::matches(predicates, &facets) {
                    continue;
                }
                aggregator.record(&facets);
            }
        }
        debug!(service, flagged = self.bots.flagged_ips(), "service scan done");
        Ok(())
    }

    /// Historical per-service counter: raw line counts, optionally with the
    /// message frequency table. No bot filtering and no predicates — the
    /// legacy count endpoints predate both.
    pub fn count_service(
        &self,
        service: &str,
        now: DateTime<Utc>,
        with_messages: bool,
    ) -> ScanResult<ServiceSummary> {
        let mut visit_count = 0;
        let mut messages = ValueTally::default();

        for path in self.service_files(service, now)? {
            let text = read_whole_file(&path)?;
            for entry in reader::parse_log_text(&path, &text)? {
                visit_count += 1;
                if with_messages {
                    messages.record(entry.message.as_deref().unwrap_or(MISSING_VALUE));
                }
            }
        }

        Ok(ServiceSummary {
            visit_count,
            messages: with_messages.then(|| messages.into_sorted()),
        })
    }

    /// Bootstrap the service's log directories, then list its eligible
    /// visit-log files.
    fn service_files(&self, service: &str, now: DateTime<Utc>) -> ScanResult<Vec<PathBuf>> {
        let service_root = self.root.join(service);
        recency::ensure_log_dirs(&service_root)?;
        recency::eligible_files(&service_root.join("log").join("visit"), now)
    }
}

fn read_whole_file(path: &Path) -> ScanResult<String> {
    fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

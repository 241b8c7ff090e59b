//! Log aggregation and bot-filtering engine
//!
//! The pipeline for one request: the recency selector picks eligible daily
//! log files, the reader parses each line, the field extractor flattens the
//! entry into facet dimensions, the bot classifier decides inclusion while
//! updating its process-wide registry, the query filter applies the
//! operator's predicates, and the aggregator tallies whatever survives.
//!
//! Every request rescans the raw files; there is no cache between requests.
//! The only state shared across requests is the [`BotRegistry`].

pub mod aggregate;
pub mod bots;
pub mod facets;
pub mod filter;
pub mod reader;
pub mod recency;
pub mod scan;

pub use aggregate::Aggregator;
pub use bots::BotRegistry;
pub use facets::FacetView;
pub use scan::VisitScanner;

use std::path::PathBuf;
use thiserror::Error;

/// A scan either completes or fails as a whole; there are no retries and no
/// partial results.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed log entry at {path}:{line}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to prepare log directories at {path}")]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ScanResult<T> = Result<T, ScanError>;

pub mod entry;
pub mod query;

pub use entry::LogLine;
pub use query::{
    AggregationResult, Dimension, DimensionTables, FacetCount, FrequencyTable, QueryPredicate,
    ServiceSummary,
};

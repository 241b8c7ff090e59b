//! Query and aggregation wire types
//!
//! These are the JSON shapes exchanged with the dashboard frontend: the
//! operator's predicate set on the way in, sorted frequency tables on the
//! way out. Field names are camelCase to match the browser contract.

use serde::{Deserialize, Serialize};

/// One of the seven classification axes used for both display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Ip,
    Country,
    Host,
    Accept,
    Referer,
    UserAgent,
    Messages,
}

impl Dimension {
    /// All dimensions in their fixed display order.
    pub const ALL: [Dimension; 7] = [
        Dimension::Ip,
        Dimension::Country,
        Dimension::Host,
        Dimension::Accept,
        Dimension::Referer,
        Dimension::UserAgent,
        Dimension::Messages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Ip => "ip",
            Dimension::Country => "country",
            Dimension::Host => "host",
            Dimension::Accept => "accept",
            Dimension::Referer => "referer",
            Dimension::UserAgent => "userAgent",
            Dimension::Messages => "messages",
        }
    }
}

/// One include/exclude constraint on a single facet value.
///
/// A query is a conjunction of these; order carries no meaning and the
/// frontend toggles duplicates away rather than stacking them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPredicate {
    pub detail: Dimension,
    pub value: String,
    pub include: bool,
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Facet values with occurrence counts, sorted by count descending.
///
/// Serialized as an ordered array; a JSON object would not survive key
/// reordering in intermediaries.
pub type FrequencyTable = Vec<FacetCount>;

/// The seven per-dimension frequency tables, in fixed display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionTables {
    pub ip: FrequencyTable,
    pub country: FrequencyTable,
    pub host: FrequencyTable,
    pub accept: FrequencyTable,
    pub referer: FrequencyTable,
    pub user_agent: FrequencyTable,
    pub messages: FrequencyTable,
}

impl DimensionTables {
    pub fn get(&self, dimension: Dimension) -> &FrequencyTable {
        match dimension {
            Dimension::Ip => &self.ip,
            Dimension::Country => &self.country,
            Dimension::Host => &self.host,
            Dimension::Accept => &self.accept,
            Dimension::Referer => &self.referer,
            Dimension::UserAgent => &self.user_agent,
            Dimension::Messages => &self.messages,
        }
    }
}

/// The complete answer to a detail query: surviving visit count plus one
/// frequency table per dimension.
///
/// Invariant: `visit_count` equals the sum of counts in every one of the
/// seven tables, because all are tallied in the same pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub visit_count: u64,
    pub details: DimensionTables,
}

/// Per-service summary for the historical count endpoints: raw line counts,
/// optionally with the message frequency table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub visit_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<FrequencyTable>,
}

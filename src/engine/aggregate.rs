//! Single-pass frequency aggregation across the facet dimensions
//!
//! The visit count and all seven per-dimension tallies advance together for
//! each surviving entry, so the count always equals the column sum of any
//! one dimension's table. Ties in the final count-descending sort break by
//! first-seen order, which keeps repeated scans of the same files stable.

use std::collections::HashMap;

use crate::models::query::{
    AggregationResult, Dimension, DimensionTables, FacetCount, FrequencyTable,
};

use super::facets::FacetView;

/// Running tally of value occurrences for one dimension.
#[derive(Debug, Default)]
pub(crate) struct ValueTally {
    counts: HashMap<String, ValueStat>,
}

#[derive(Debug)]
struct ValueStat {
    count: u64,
    first_seen: usize,
}

impl ValueTally {
    pub(crate) fn record(&mut self, value: &str) {
        let rank = self.counts.len();
        match self.counts.get_mut(value) {
            Some(stat) => stat.count += 1,
            None => {
                self.counts.insert(
                    value.to_string(),
                    ValueStat {
                        count: 1,
                        first_seen: rank,
                    },
                );
            }
        }
    }

    pub(crate) fn into_sorted(self) -> FrequencyTable {
        let mut entries: Vec<(String, ValueStat)> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries
            .into_iter()
            .map(|(value, stat)| FacetCount {
                value,
                count: stat.count,
            })
            .collect()
    }
}

/// Tallies all seven dimensions plus the visit count in one pass.
#[derive(Debug, Default)]
pub struct Aggregator {
    visit_count: u64,
    dimensions: [ValueTally; 7],
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one surviving entry across every dimension.
    pub fn record(&mut self, facets: &FacetView) {
        self.visit_count += 1;
        for (tally, dimension) in self.dimensions.iter_mut().zip(Dimension::ALL) {
            tally.record(facets.value(dimension));
        }
    }

    /// Emit the sorted frequency tables.
    pub fn finish(self) -> AggregationResult {
        let [ip, country, host, accept, referer, user_agent, messages] =
            self.dimensions.map(ValueTally::into_sorted);
        AggregationResult {
            visit_count: self.visit_count,
            details: DimensionTables {
                ip,
                country,
                host,
                accept,
                referer,
                user_agent,
                messages,
            },
        }
    }
}

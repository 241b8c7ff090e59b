//! Include/exclude predicate evaluation
//!
//! Predicates are conjunctive: every one must hold independently, in any
//! order. Bot-classified entries never reach this stage; the bot filter is
//! unconditional and runs first.

use crate::models::query::QueryPredicate;

use super::facets::FacetView;

/// Whether an entry's facets satisfy every predicate.
///
/// An include predicate requires the facet's rendered value to equal the
/// predicate value; an exclude predicate requires it to differ.
pub fn matches(predicates: &[QueryPredicate], facets: &FacetView) -> bool {
    predicates
        .iter()
        .all(|p| (facets.value(p.detail) == p.value) == p.include)
}

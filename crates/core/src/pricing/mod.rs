//! Pricing module - catalog records, matching keys and the lookup index.

mod matching_key;
mod pricing_index;
mod pricing_model;

pub use matching_key::{build_key, normalize, MatchingCriteria};
pub use pricing_index::PricingIndex;
pub use pricing_model::{PricingRecord, ReservedRate, ReservedRates, Scenario, ScenarioRate};

#[cfg(test)]
mod pricing_index_tests;

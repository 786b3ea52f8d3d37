//! Timeseries module - per-scenario monthly cost series, merging and comparison.

mod scenario_comparison;
mod scenario_merger;
mod timeseries_builder;
mod timeseries_model;

pub use scenario_comparison::{compare_scenarios, ScenarioComparison, ScenarioSummary};
pub use scenario_merger::merge_rows;
pub use timeseries_builder::{
    build_portfolio_series, build_series, CostTimeseriesBuilder, PortfolioSeries,
};
pub use timeseries_model::{CostPair, MonthlyCostEntry, ScenarioCosts};

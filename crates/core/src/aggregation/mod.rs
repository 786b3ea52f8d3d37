//! Cost aggregation module - month/group cost tables with diagnostics.

mod aggregation_model;
mod aggregation_service;

pub use aggregation_model::{
    savings_percentage, AggregateDetail, AggregationResult, CostDiagnostics, DiagnosticBucket,
    DiagnosticKind, DiagnosticSample, MonthlyAggregates, MonthlyCostAggregate,
};
pub use aggregation_service::{aggregate, CostAggregationEngine};

#[cfg(test)]
mod aggregation_service_tests;
